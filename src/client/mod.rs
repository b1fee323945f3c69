//! Consuming-application side of the API: a thin HTTP client plus the
//! poll loop that drives a generation job to a terminal state.

pub mod http;
pub mod poller;

use std::fmt;

pub use http::ApiClient;
pub use poller::{PollOutcome, PollerConfig, StatusApi, StatusPoller};

/// Client-side errors
#[derive(Debug)]
pub enum ClientError {
    /// The request never produced a usable response
    Transport(reqwest::Error),

    /// The server answered with a non-success status
    Api { status: u16, message: String },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(e) => write!(f, "transport error: {}", e),
            ClientError::Api { status, message } => {
                write!(f, "api error ({}): {}", status, message)
            }
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err)
    }
}
