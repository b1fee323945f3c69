use actix_web::{HttpResponse, ResponseError};
use std::fmt;
use tracing::{error, info, warn};

use crate::api::validation::ErrorResponse;
use crate::store::{JobStatus, JobStore};
use crate::worker::ProgressSimulator;

use super::dto::{GenerateResponse, StatusResponse};
use super::models::GenerateRequest;

/// Service-level errors
#[derive(Debug)]
pub enum ServiceError {
    /// Request input was missing or invalid
    Validation(String),

    /// Unknown job or result id
    NotFound(String),

    /// Unexpected failure
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ServiceError::NotFound(what) => write!(f, "Not found: {}", what),
            ServiceError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::Validation(msg) => {
                warn!("Validation error: {}", msg);
                HttpResponse::BadRequest().json(ErrorResponse::new(msg))
            }
            ServiceError::NotFound(what) => {
                warn!("Not found: {}", what);
                HttpResponse::NotFound().json(ErrorResponse::new("Job not found"))
            }
            ServiceError::Internal(detail) => {
                error!("Internal error: {}", detail);
                let message = if cfg!(debug_assertions) {
                    format!("Internal server error: {}", detail)
                } else {
                    "Internal server error".to_string()
                };
                HttpResponse::InternalServerError().json(ErrorResponse::new(&message))
            }
        }
    }
}

/// Derive the user-facing phase message from status and progress. The
/// client poller reuses this same table, so both sides always agree.
pub fn phase_message(status: JobStatus, progress: u8) -> &'static str {
    match status {
        JobStatus::Processing => match progress {
            0..=24 => "Analyzing your photo...",
            25..=49 => "Applying professional style...",
            50..=74 => "Enhancing details...",
            75..=99 => "Finalizing your headshot...",
            _ => "Processing complete!",
        },
        JobStatus::Completed => "Your professional headshot is ready!",
        JobStatus::Failed => "Processing failed. Please try again.",
    }
}

/// Generation service: creates jobs, hands them to the simulator, and
/// answers status queries from the store.
pub struct GenerationService {
    store: JobStore,
    simulator: ProgressSimulator,
}

impl GenerationService {
    pub fn new(store: JobStore, simulator: ProgressSimulator) -> Self {
        Self { store, simulator }
    }

    /// Create a job for the requested style and kick off its simulated
    /// processing. Returns before any progress is made; the job id is the
    /// handle for subsequent status polls.
    pub fn start_generation(&self, request: &GenerateRequest) -> GenerateResponse {
        let job = self.store.create(request.style.as_str());
        info!(
            "generation started: job={} file={} style={}",
            job.id,
            request.file_id,
            request.style.as_str()
        );

        self.simulator.start(job.id.clone());

        GenerateResponse {
            success: true,
            message: "Processing started".to_string(),
            generated_image_id: Some(job.id),
        }
    }

    /// Current state of a job, translated for the client.
    pub fn job_status(&self, job_id: &str) -> Result<StatusResponse, ServiceError> {
        let job = self
            .store
            .get(job_id)
            .ok_or_else(|| ServiceError::NotFound(format!("job {}", job_id)))?;

        Ok(StatusResponse {
            success: true,
            status: job.status,
            progress: job.progress,
            message: phase_message(job.status, job.progress).to_string(),
            result_id: job.result_id,
        })
    }
}
