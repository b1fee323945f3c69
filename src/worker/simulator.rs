use rand::Rng;
use tokio::sync::watch;
use tokio::time::{self, Duration, Instant};
use tracing::{debug, info};

use crate::store::{new_result_id, JobStore};

/// Tuning knobs for the simulated generation pipeline
#[derive(Clone, Debug)]
pub struct SimulatorConfig {
    /// Delay between progress updates
    pub progress_interval: Duration,
    /// Ordered progress percentages walked one per tick
    pub progress_steps: Vec<u8>,
    /// Chance, decided once at job start, that the job is scheduled to fail
    pub failure_probability: f64,
    /// Delay from job start until a scheduled failure fires
    pub failure_delay: Duration,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            progress_interval: Duration::from_millis(2000),
            progress_steps: vec![10, 25, 50, 75, 90, 100],
            failure_probability: 0.05,
            failure_delay: Duration::from_millis(3000),
        }
    }
}

/// Roll the dice for a freshly created job. Generic over the RNG so tests
/// can calibrate the failure rate with a seeded generator.
pub fn decide_failure<R: Rng>(rng: &mut R, probability: f64) -> bool {
    rng.gen_bool(probability.clamp(0.0, 1.0))
}

/// Background driver that advances jobs through a scripted progress
/// sequence and occasionally fails them.
///
/// # Architecture
/// - `start` spawns one progress task per job; a tick every
///   `progress_interval` writes the next step, and the tick after the last
///   step marks the job completed with a fresh result id
/// - With probability `failure_probability` a second task is spawned that
///   forces the job to `failed` after `failure_delay`
/// - The two timelines are independent; every write goes through the
///   store's guarded transitions, so the first terminal transition wins and
///   the loser becomes a no-op
/// - All tasks exit early when the process-wide shutdown signal flips
#[derive(Clone)]
pub struct ProgressSimulator {
    store: JobStore,
    config: SimulatorConfig,
    shutdown_rx: watch::Receiver<bool>,
}

impl ProgressSimulator {
    pub fn new(store: JobStore, config: SimulatorConfig, shutdown_rx: watch::Receiver<bool>) -> Self {
        Self {
            store,
            config,
            shutdown_rx,
        }
    }

    /// Begin simulated processing for a job. Returns immediately; all
    /// progression happens on spawned timer tasks.
    pub fn start(&self, job_id: String) {
        let scheduled_to_fail =
            decide_failure(&mut rand::thread_rng(), self.config.failure_probability);

        info!(
            "simulator started for job {} (scheduled_to_fail={})",
            job_id, scheduled_to_fail
        );

        if scheduled_to_fail {
            self.spawn_failure_timer(job_id.clone());
        }
        self.spawn_progress_loop(job_id);
    }

    fn spawn_progress_loop(&self, job_id: String) {
        let store = self.store.clone();
        let steps = self.config.progress_steps.clone();
        let period = self.config.progress_interval;
        let mut shutdown_rx = self.shutdown_rx.clone();

        tokio::spawn(async move {
            // first tick lands one full interval after creation
            let mut ticker = time::interval_at(Instant::now() + period, period);
            let mut cursor = 0usize;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = shutdown_rx.changed() => {
                        debug!("shutdown: abandoning progress loop for job {}", job_id);
                        return;
                    }
                }

                if cursor >= steps.len() {
                    let result_id = new_result_id();
                    if store.complete(&job_id, &result_id) {
                        info!("job {} completed, result {}", job_id, result_id);
                    } else {
                        debug!("job {} already terminal, skipping completion", job_id);
                    }
                    return;
                }

                if !store.advance(&job_id, steps[cursor]) {
                    // failure timer won the race; nothing left to do here
                    debug!("job {} reached a terminal state, stopping ticks", job_id);
                    return;
                }
                cursor += 1;
            }
        });
    }

    fn spawn_failure_timer(&self, job_id: String) {
        let store = self.store.clone();
        let delay = self.config.failure_delay;
        let mut shutdown_rx = self.shutdown_rx.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = time::sleep(delay) => {}
                _ = shutdown_rx.changed() => return,
            }

            if store.fail(&job_id) {
                info!("job {} failed (simulated)", job_id);
            } else {
                debug!("job {} already terminal, failure timer is a no-op", job_id);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JobStatus;
    use rand::{rngs::StdRng, SeedableRng};

    fn simulator(store: &JobStore, config: SimulatorConfig) -> (ProgressSimulator, watch::Sender<bool>) {
        let (tx, rx) = watch::channel(false);
        (ProgressSimulator::new(store.clone(), config, rx), tx)
    }

    fn never_failing(interval_ms: u64, steps: Vec<u8>) -> SimulatorConfig {
        SimulatorConfig {
            progress_interval: Duration::from_millis(interval_ms),
            progress_steps: steps,
            failure_probability: 0.0,
            failure_delay: Duration::from_millis(5),
        }
    }

    #[tokio::test]
    async fn walks_all_steps_then_completes() {
        let store = JobStore::new();
        let (sim, _tx) = simulator(&store, never_failing(5, vec![10, 25, 50, 75, 90, 100]));

        let job = store.create("corporate");
        sim.start(job.id.clone());

        time::sleep(Duration::from_millis(200)).await;

        let done = store.get(&job.id).unwrap();
        assert_eq!(done.status, JobStatus::Completed);
        assert_eq!(done.progress, 100);
        let result_id = done.result_id.expect("completed job must carry a result id");
        assert!(result_id.starts_with("result-"));
    }

    #[tokio::test]
    async fn scheduled_failure_wins_while_still_processing() {
        let store = JobStore::new();
        // progress so slow it never ticks; failure always scheduled
        let config = SimulatorConfig {
            progress_interval: Duration::from_secs(3600),
            progress_steps: vec![10, 25, 50, 75, 90, 100],
            failure_probability: 1.0,
            failure_delay: Duration::from_millis(10),
        };
        let (sim, _tx) = simulator(&store, config);

        let job = store.create("creative");
        sim.start(job.id.clone());

        time::sleep(Duration::from_millis(100)).await;

        let failed = store.get(&job.id).unwrap();
        assert_eq!(failed.status, JobStatus::Failed);
        assert_eq!(failed.progress, 0);
        assert!(failed.result_id.is_none());
    }

    #[tokio::test]
    async fn completion_wins_over_late_failure_timer() {
        let store = JobStore::new();
        // two quick steps, failure timer scheduled but far too late
        let config = SimulatorConfig {
            progress_interval: Duration::from_millis(5),
            progress_steps: vec![50, 100],
            failure_probability: 1.0,
            failure_delay: Duration::from_millis(150),
        };
        let (sim, _tx) = simulator(&store, config);

        let job = store.create("executive");
        sim.start(job.id.clone());

        time::sleep(Duration::from_millis(100)).await;
        let done = store.get(&job.id).unwrap();
        assert_eq!(done.status, JobStatus::Completed);
        let result_id = done.result_id.clone();

        // let the failure timer fire against the completed job
        time::sleep(Duration::from_millis(150)).await;
        let still_done = store.get(&job.id).unwrap();
        assert_eq!(still_done.status, JobStatus::Completed);
        assert_eq!(still_done.progress, 100);
        assert_eq!(still_done.result_id, result_id);
    }

    #[tokio::test]
    async fn progress_is_non_decreasing_until_terminal() {
        let store = JobStore::new();
        let (sim, _tx) = simulator(&store, never_failing(5, vec![10, 25, 50, 75, 90, 100]));

        let job = store.create("corporate");
        sim.start(job.id.clone());

        let mut last = 0u8;
        loop {
            let snapshot = store.get(&job.id).unwrap();
            assert!(
                snapshot.progress >= last,
                "progress went backwards: {} -> {}",
                last,
                snapshot.progress
            );
            last = snapshot.progress;
            if snapshot.status.is_terminal() {
                break;
            }
            time::sleep(Duration::from_millis(2)).await;
        }
    }

    #[tokio::test]
    async fn shutdown_signal_stops_progression() {
        let store = JobStore::new();
        let (sim, tx) = simulator(&store, never_failing(10, vec![10, 25, 50, 75, 90, 100]));

        let job = store.create("corporate");
        sim.start(job.id.clone());

        tx.send(true).unwrap();
        time::sleep(Duration::from_millis(100)).await;

        let frozen = store.get(&job.id).unwrap();
        assert_eq!(frozen.status, JobStatus::Processing);
    }

    #[test]
    fn failure_rate_calibration() {
        let mut rng = StdRng::seed_from_u64(42);
        let n = 10_000;
        let failures = (0..n)
            .filter(|_| decide_failure(&mut rng, 0.05))
            .count();
        let rate = failures as f64 / n as f64;
        assert!(
            (0.04..=0.06).contains(&rate),
            "failure rate {} outside tolerance around 0.05",
            rate
        );
    }

    #[test]
    fn decide_failure_clamps_probability() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(decide_failure(&mut rng, 2.0));
        assert!(!decide_failure(&mut rng, -1.0));
    }
}
