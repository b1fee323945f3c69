use async_trait::async_trait;
use tokio::time::{sleep, Duration};
use tracing::debug;

use crate::api::generate::dto::StatusResponse;
use crate::store::JobStatus;

use super::ClientError;

/// Narrow seam over the status endpoint so the poll loop can be exercised
/// against a scripted transport.
#[async_trait]
pub trait StatusApi {
    async fn job_status(&self, job_id: &str) -> Result<StatusResponse, ClientError>;
}

/// Poll cadence: one initial delay after the generate ack, then a fixed
/// interval between checks.
#[derive(Clone, Debug)]
pub struct PollerConfig {
    pub initial_delay: Duration,
    pub poll_interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(1000),
            poll_interval: Duration::from_millis(2000),
        }
    }
}

/// Terminal result of a poll loop
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Completed { result_id: Option<String> },
    Failed { message: String },
}

/// Drives the status endpoint until the job reaches a terminal state.
///
/// Progress is reported through the callback on every response. A `failed`
/// status is a normal outcome, mapped to a fixed user-facing message. A
/// transport or API error aborts the loop with no retry. There is no
/// attempt ceiling or overall deadline.
pub struct StatusPoller<A> {
    api: A,
    config: PollerConfig,
}

impl<A: StatusApi> StatusPoller<A> {
    pub fn new(api: A) -> Self {
        Self::with_config(api, PollerConfig::default())
    }

    pub fn with_config(api: A, config: PollerConfig) -> Self {
        Self { api, config }
    }

    pub async fn poll_until_terminal(
        &self,
        job_id: &str,
        mut on_update: impl FnMut(&StatusResponse),
    ) -> Result<PollOutcome, ClientError> {
        sleep(self.config.initial_delay).await;

        loop {
            let status = self.api.job_status(job_id).await?;
            debug!(
                "job {}: {} ({}%)",
                job_id,
                status.message,
                status.progress
            );
            on_update(&status);

            match status.status {
                JobStatus::Completed => {
                    return Ok(PollOutcome::Completed {
                        result_id: status.result_id,
                    })
                }
                JobStatus::Failed => {
                    return Ok(PollOutcome::Failed {
                        message: "Generation failed. Please try again.".to_string(),
                    })
                }
                JobStatus::Processing => sleep(self.config.poll_interval).await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::generate::service::phase_message;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct ScriptedApi {
        responses: Mutex<VecDeque<Result<StatusResponse, ClientError>>>,
    }

    impl ScriptedApi {
        fn new(responses: Vec<Result<StatusResponse, ClientError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl StatusApi for ScriptedApi {
        async fn job_status(&self, _job_id: &str) -> Result<StatusResponse, ClientError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("poller asked for more statuses than scripted")
        }
    }

    fn status(job_status: JobStatus, progress: u8, result_id: Option<&str>) -> StatusResponse {
        StatusResponse {
            success: true,
            status: job_status,
            progress,
            message: phase_message(job_status, progress).to_string(),
            result_id: result_id.map(str::to_string),
        }
    }

    fn fast_config() -> PollerConfig {
        PollerConfig {
            initial_delay: Duration::from_millis(1),
            poll_interval: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn polls_until_completed_and_reports_progress() {
        let api = ScriptedApi::new(vec![
            Ok(status(JobStatus::Processing, 10, None)),
            Ok(status(JobStatus::Processing, 50, None)),
            Ok(status(JobStatus::Completed, 100, Some("result-1-abc"))),
        ]);
        let poller = StatusPoller::with_config(api, fast_config());

        let mut seen = Vec::new();
        let outcome = poller
            .poll_until_terminal("job-1-abc", |s| seen.push(s.progress))
            .await
            .unwrap();

        assert_eq!(seen, vec![10, 50, 100]);
        assert_eq!(
            outcome,
            PollOutcome::Completed {
                result_id: Some("result-1-abc".to_string())
            }
        );
    }

    #[tokio::test]
    async fn failed_status_maps_to_fixed_message() {
        let api = ScriptedApi::new(vec![
            Ok(status(JobStatus::Processing, 25, None)),
            Ok(status(JobStatus::Failed, 0, None)),
        ]);
        let poller = StatusPoller::with_config(api, fast_config());

        let outcome = poller
            .poll_until_terminal("job-1-abc", |_| {})
            .await
            .unwrap();

        assert_eq!(
            outcome,
            PollOutcome::Failed {
                message: "Generation failed. Please try again.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn transport_error_aborts_without_retry() {
        // the script ends right after the error; a retry would panic on an
        // empty deque inside the mock
        let api = ScriptedApi::new(vec![
            Ok(status(JobStatus::Processing, 10, None)),
            Err(ClientError::Api {
                status: 500,
                message: "boom".to_string(),
            }),
        ]);
        let poller = StatusPoller::with_config(api, fast_config());

        let err = poller
            .poll_until_terminal("job-1-abc", |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Api { status: 500, .. }));
    }
}
