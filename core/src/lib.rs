//! loadpace-core: Rate-paced HTTP load generation engine
//!
//! This crate drives a target endpoint at a controlled request rate with a
//! bounded pool of concurrent workers, including:
//!
//! - Run configuration and validation
//! - A fixed-grid rate limiter feeding a bounded permit queue
//! - Workers executing requests through a swappable executor
//! - Lock-light running statistics and live progress reporting
//! - The orchestrator tying the run lifecycle together

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod config;
pub mod error;
pub mod metrics;
pub mod orchestrator;
pub mod progress;
pub mod request;
pub mod response;
pub mod traits;
pub mod worker;

pub use config::{ConfigError, LoadTestConfig, MAX_CONCURRENCY, MAX_RATE};
pub use error::{Error, Result};
pub use metrics::{RunStats, StatsSnapshot};
pub use orchestrator::{Orchestrator, OrchestratorBuilder, RunSummary};
pub use progress::{ProgressLine, ProgressReporter, DEFAULT_PROGRESS_PERIOD};
pub use request::HttpExecutor;
pub use response::{OutcomeClass, RequestOutcome, StatusKey, TRANSPORT_FAILURE_STATUS};
pub use traits::RequestExecutor;
pub use worker::{RequestRateLimiter, ThinkTime, Worker, WorkerBuilder, WorkerStats};
