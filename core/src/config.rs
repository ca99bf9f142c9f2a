//! Load test configuration types

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Highest accepted target rate; keeps the inter-arrival interval non-zero.
pub const MAX_RATE: u32 = 1_000_000;

/// Highest accepted worker count; each worker is its own task.
pub const MAX_CONCURRENCY: usize = 100_000;

/// Load test configuration
///
/// Defines the target, how many requests to issue, how fast, and with how
/// many concurrent workers. Immutable for the duration of a run; the
/// orchestrator shares it with every worker behind an `Arc`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadTestConfig {
    /// Target endpoint (absolute http/https URL)
    pub target: String,

    /// Total number of requests to issue
    pub requests: u64,

    /// Target request rate (requests per second)
    pub rate: u32,

    /// Number of concurrent workers
    pub concurrency: usize,

    /// Per-request timeout
    pub timeout: Duration,

    /// Nominal pause between a worker's requests
    pub think_time: Duration,

    /// Whether the progress line is displayed during the run
    pub show_progress: bool,
}

impl Default for LoadTestConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            requests: 100,
            rate: 10,
            concurrency: 5,
            timeout: Duration::from_secs(30),
            think_time: Duration::from_millis(100),
            show_progress: true,
        }
    }
}

impl LoadTestConfig {
    /// Create a new config for the given target with default settings
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Default::default()
        }
    }

    /// Set the total request count
    pub fn with_requests(mut self, requests: u64) -> Self {
        self.requests = requests;
        self
    }

    /// Set the target rate (requests per second)
    pub fn with_rate(mut self, rate: u32) -> Self {
        self.rate = rate;
        self
    }

    /// Set the number of workers
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the nominal think-time
    pub fn with_think_time(mut self, think_time: Duration) -> Self {
        self.think_time = think_time;
        self
    }

    /// Enable or disable the progress line
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Estimated run duration at the target rate, ignoring worker throughput
    pub fn estimated_duration(&self) -> Duration {
        if self.rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.requests as f64 / f64::from(self.rate))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target.trim().is_empty() {
            return Err(ConfigError::InvalidTarget("target URL is required".into()));
        }

        let url = Url::parse(&self.target)
            .map_err(|e| ConfigError::InvalidTarget(format!("invalid URL: {e}")))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidTarget(
                "URL must use http or https scheme".into(),
            ));
        }

        if self.requests == 0 {
            return Err(ConfigError::InvalidRequestCount(
                "requests must be at least 1".into(),
            ));
        }

        if self.rate == 0 {
            return Err(ConfigError::InvalidRate("rate must be at least 1".into()));
        }
        if self.rate > MAX_RATE {
            return Err(ConfigError::InvalidRate(format!(
                "rate must not exceed {MAX_RATE} requests per second"
            )));
        }

        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency(
                "concurrency must be at least 1".into(),
            ));
        }
        if self.concurrency > MAX_CONCURRENCY {
            return Err(ConfigError::InvalidConcurrency(format!(
                "concurrency must not exceed {MAX_CONCURRENCY} workers"
            )));
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "timeout must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Missing or malformed target
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// Invalid total request count
    #[error("Invalid request count: {0}")]
    InvalidRequestCount(String),

    /// Invalid target rate
    #[error("Invalid rate: {0}")]
    InvalidRate(String),

    /// Invalid concurrency value
    #[error("Invalid concurrency: {0}")]
    InvalidConcurrency(String),

    /// Invalid timeout
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),
}
