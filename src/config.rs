use std::env;
use std::path::PathBuf;

use tokio::time::Duration;

use crate::worker::SimulatorConfig;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Interface the HTTP server binds to
    pub host: String,
    pub port: u16,

    /// Directory where accepted uploads are stored
    pub upload_dir: PathBuf,

    /// Maximum payload size for all requests (in bytes)
    /// Default: 10MB (10 * 1024 * 1024)
    pub max_payload_size: usize,

    /// Directory for rolling log files
    pub log_dir: String,

    /// Delay between simulated progress updates
    pub progress_interval_ms: u64,

    /// Ordered progress percentages, one per tick
    pub progress_steps: Vec<u8>,

    /// Chance that a job is scheduled to fail, clamped to [0, 1]
    pub failure_probability: f64,

    /// Delay from job start until a scheduled failure fires
    pub failure_delay_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// All variables are optional and fall back to the defaults the
    /// original deployment used: HOST, PORT, UPLOAD_DIR, MAX_PAYLOAD_SIZE,
    /// LOG_DIR, PROGRESS_INTERVAL_MS, PROGRESS_STEPS,
    /// FAILURE_PROBABILITY, FAILURE_DELAY_MS.
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| format!("PORT must be a number, got {:?}", raw))?,
            Err(_) => 3001,
        };

        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./uploads"));

        let max_payload_size = env::var("MAX_PAYLOAD_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10 * 1024 * 1024); // Default: 10MB

        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string());

        let progress_interval_ms = env::var("PROGRESS_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(2000);

        let progress_steps = match env::var("PROGRESS_STEPS") {
            Ok(raw) => parse_steps(&raw)?,
            Err(_) => vec![10, 25, 50, 75, 90, 100],
        };

        let failure_probability = env::var("FAILURE_PROBABILITY")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(0.05)
            .clamp(0.0, 1.0);

        let failure_delay_ms = env::var("FAILURE_DELAY_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        Ok(Config {
            host,
            port,
            upload_dir,
            max_payload_size,
            log_dir,
            progress_interval_ms,
            progress_steps,
            failure_probability,
            failure_delay_ms,
        })
    }

    pub fn simulator(&self) -> SimulatorConfig {
        SimulatorConfig {
            progress_interval: Duration::from_millis(self.progress_interval_ms),
            progress_steps: self.progress_steps.clone(),
            failure_probability: self.failure_probability,
            failure_delay: Duration::from_millis(self.failure_delay_ms),
        }
    }
}

/// Parse a comma-separated percentage list, e.g. "10,25,50,75,90,100"
fn parse_steps(raw: &str) -> Result<Vec<u8>, String> {
    let steps = raw
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<u8>()
                .ok()
                .filter(|p| *p <= 100)
                .ok_or_else(|| format!("PROGRESS_STEPS entry {:?} is not a percentage", part))
        })
        .collect::<Result<Vec<u8>, String>>()?;

    if steps.is_empty() {
        return Err("PROGRESS_STEPS must contain at least one step".to_string());
    }
    Ok(steps)
}
