use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use super::models::{Job, JobStatus};

/// In-memory store for all generation jobs, keyed by job id.
///
/// Lifetime equals process lifetime: there is no eviction and no capacity
/// bound. The simulator is the only writer after creation; the HTTP
/// handlers only read. Critical sections never hold the lock across an
/// await point.
#[derive(Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<String, Job>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new processing job for the given style and return a
    /// snapshot of it. Ids are regenerated on the (practically impossible)
    /// collision with an existing entry.
    pub fn create(&self, style: &str) -> Job {
        let mut jobs = self.jobs.write().expect("job store lock poisoned");
        let mut job = Job::new(style);
        while jobs.contains_key(&job.id) {
            warn!("job id collision on {}, regenerating", job.id);
            job = Job::new(style);
        }
        debug!("created job {} (style={})", job.id, style);
        jobs.insert(job.id.clone(), job.clone());
        job
    }

    /// Pure lookup, returns a snapshot of the current state.
    pub fn get(&self, job_id: &str) -> Option<Job> {
        let jobs = self.jobs.read().expect("job store lock poisoned");
        jobs.get(job_id).cloned()
    }

    /// Apply a state transition to the stored job in place. Used by the
    /// simulator; handlers must go through `get`.
    pub fn mutate<T>(&self, job_id: &str, f: impl FnOnce(&mut Job) -> T) -> Option<T> {
        let mut jobs = self.jobs.write().expect("job store lock poisoned");
        jobs.get_mut(job_id).map(f)
    }

    /// Set progress to the next scheduled value. Returns false when the
    /// job is unknown or already terminal, in which case nothing changes.
    pub fn advance(&self, job_id: &str, progress: u8) -> bool {
        self.mutate(job_id, |job| {
            if job.status != JobStatus::Processing {
                return false;
            }
            job.progress = progress;
            true
        })
        .unwrap_or(false)
    }

    /// Transition to `completed` with a fresh result id. The check on the
    /// current status makes the first terminal transition win; a late
    /// failure timer observes `false` and leaves the job untouched.
    pub fn complete(&self, job_id: &str, result_id: &str) -> bool {
        self.mutate(job_id, |job| {
            if job.status != JobStatus::Processing {
                return false;
            }
            job.status = JobStatus::Completed;
            job.progress = 100;
            job.result_id = Some(result_id.to_string());
            true
        })
        .unwrap_or(false)
    }

    /// Transition to `failed`, resetting progress to 0. Same guard as
    /// `complete`: a no-op once the job is terminal.
    pub fn fail(&self, job_id: &str) -> bool {
        self.mutate(job_id, |job| {
            if job.status != JobStatus::Processing {
                return false;
            }
            job.status = JobStatus::Failed;
            job.progress = 0;
            true
        })
        .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_get_roundtrip() {
        let store = JobStore::new();
        let job = store.create("creative");
        let found = store.get(&job.id).unwrap();
        assert_eq!(found.id, job.id);
        assert_eq!(found.status, JobStatus::Processing);
        assert_eq!(found.progress, 0);
        assert_eq!(found.style, "creative");
    }

    #[test]
    fn get_unknown_returns_none() {
        let store = JobStore::new();
        assert!(store.get("job-0-missing").is_none());
    }

    #[test]
    fn ids_are_unique_across_creates() {
        let store = JobStore::new();
        let a = store.create("corporate");
        let b = store.create("corporate");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn advance_updates_processing_job() {
        let store = JobStore::new();
        let job = store.create("corporate");
        assert!(store.advance(&job.id, 25));
        assert_eq!(store.get(&job.id).unwrap().progress, 25);
    }

    #[test]
    fn complete_sets_result_id_and_full_progress() {
        let store = JobStore::new();
        let job = store.create("executive");
        store.advance(&job.id, 90);
        assert!(store.complete(&job.id, "result-1-abc"));

        let done = store.get(&job.id).unwrap();
        assert_eq!(done.status, JobStatus::Completed);
        assert_eq!(done.progress, 100);
        assert_eq!(done.result_id.as_deref(), Some("result-1-abc"));
    }

    #[test]
    fn fail_resets_progress_and_leaves_no_result() {
        let store = JobStore::new();
        let job = store.create("corporate");
        store.advance(&job.id, 50);
        assert!(store.fail(&job.id));

        let failed = store.get(&job.id).unwrap();
        assert_eq!(failed.status, JobStatus::Failed);
        assert_eq!(failed.progress, 0);
        assert!(failed.result_id.is_none());
    }

    #[test]
    fn terminal_transition_happens_exactly_once() {
        let store = JobStore::new();
        let job = store.create("corporate");

        assert!(store.complete(&job.id, "result-1-abc"));
        // late failure timer loses the race
        assert!(!store.fail(&job.id));
        assert!(!store.complete(&job.id, "result-2-def"));
        assert!(!store.advance(&job.id, 10));

        let done = store.get(&job.id).unwrap();
        assert_eq!(done.status, JobStatus::Completed);
        assert_eq!(done.progress, 100);
        assert_eq!(done.result_id.as_deref(), Some("result-1-abc"));
    }

    #[test]
    fn completion_after_failure_is_rejected() {
        let store = JobStore::new();
        let job = store.create("corporate");

        assert!(store.fail(&job.id));
        assert!(!store.complete(&job.id, "result-1-abc"));

        let failed = store.get(&job.id).unwrap();
        assert_eq!(failed.status, JobStatus::Failed);
        assert!(failed.result_id.is_none());
    }

    #[test]
    fn transitions_on_unknown_job_are_noops() {
        let store = JobStore::new();
        assert!(!store.advance("job-0-missing", 10));
        assert!(!store.complete("job-0-missing", "result-1-abc"));
        assert!(!store.fail("job-0-missing"));
    }
}
