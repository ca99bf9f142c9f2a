//! Orchestrator for load test lifecycle management
//!
//! The Orchestrator coordinates a complete run:
//! - Creating the shared run statistics
//! - Starting the progress reporter and the worker pool
//! - Driving the rate limiter that feeds the permit queue
//! - Managing graceful shutdown via a cancellation token
//! - Finalizing and returning the statistics
//!
//! # Example
//!
//! ```ignore
//! use loadpace_core::{LoadTestConfig, OrchestratorBuilder};
//!
//! let orchestrator = OrchestratorBuilder::new()
//!     .config(LoadTestConfig::new("http://localhost:8080/").with_requests(1000))
//!     .build()?;
//!
//! let summary = orchestrator.run_with_signal_handling().await?;
//! println!("{} requests", summary.stats.total);
//! ```

mod aggregator;
mod builder;
mod executor;

pub use aggregator::{aggregate_worker_stats, AggregatedStats};
pub use builder::OrchestratorBuilder;
pub use executor::{Orchestrator, RunSummary};

#[cfg(test)]
mod tests;
