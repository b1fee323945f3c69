pub mod job_store;
pub mod models;

// Re-export commonly used types
pub use job_store::JobStore;
pub use models::{new_result_id, Job, JobStatus};
