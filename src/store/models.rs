use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

/// Job status enum representing the state of a simulated generation job
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Terminal states never transition again
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// A tracked unit of simulated generation work
#[derive(Debug, Clone)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    /// Percentage in [0, 100]; reset to 0 when the job fails
    pub progress: u8,
    /// Requested style tag, stored for reference only
    pub style: String,
    pub started_at: DateTime<Utc>,
    /// Set if and only if the job completed
    pub result_id: Option<String>,
}

impl Job {
    pub fn new(style: &str) -> Self {
        Self {
            id: new_job_id(),
            status: JobStatus::Processing,
            progress: 0,
            style: style.to_string(),
            started_at: Utc::now(),
            result_id: None,
        }
    }
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

/// Allocate an external job handle, e.g. `job-1727712000000-x4k9qmw2a`
pub fn new_job_id() -> String {
    format!("job-{}-{}", Utc::now().timestamp_millis(), random_suffix())
}

/// Allocate a mock result artifact id, e.g. `result-1727712000000-p0c3hnd8q`
pub fn new_result_id() -> String {
    format!("result-{}-{}", Utc::now().timestamp_millis(), random_suffix())
}
