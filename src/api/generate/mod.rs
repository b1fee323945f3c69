pub mod dto;
pub mod handlers;
pub mod models;
pub mod service;

// Re-export commonly used types
pub use dto::{GenerateResponse, StatusResponse};
pub use models::{GenerateRequest, HeadshotStyle};
pub use service::{phase_message, GenerationService, ServiceError};
