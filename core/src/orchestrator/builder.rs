//! Builder pattern for Orchestrator construction

use std::sync::Arc;
use std::time::Duration;

use indicatif::ProgressBar;
use tokio_util::sync::CancellationToken;

use crate::config::LoadTestConfig;
use crate::error::Result;
use crate::progress::DEFAULT_PROGRESS_PERIOD;
use crate::request::HttpExecutor;
use crate::traits::RequestExecutor;

use super::executor::Orchestrator;

/// Builder for creating an Orchestrator with proper configuration
///
/// # Example
///
/// ```ignore
/// let orchestrator = OrchestratorBuilder::new()
///     .config(LoadTestConfig::new("http://localhost:8080/").with_rate(100))
///     .build()?;
///
/// let summary = orchestrator.run_with_signal_handling().await?;
/// ```
pub struct OrchestratorBuilder {
    config: LoadTestConfig,
    executor: Option<Arc<dyn RequestExecutor>>,
    progress_period: Duration,
    progress_bar: Option<ProgressBar>,
    seed: Option<u64>,
}

impl OrchestratorBuilder {
    /// Create a new orchestrator builder with default configuration
    pub fn new() -> Self {
        Self {
            config: LoadTestConfig::default(),
            executor: None,
            progress_period: DEFAULT_PROGRESS_PERIOD,
            progress_bar: None,
            seed: None,
        }
    }

    /// Set the full run configuration
    pub fn config(mut self, config: LoadTestConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom executor instead of the HTTP one
    pub fn executor(mut self, executor: Arc<dyn RequestExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Set how often the progress line refreshes
    pub fn progress_period(mut self, period: Duration) -> Self {
        self.progress_period = period;
        self
    }

    /// Draw progress into this bar rather than stderr
    pub fn progress_bar(mut self, bar: ProgressBar) -> Self {
        self.progress_bar = Some(bar);
        self
    }

    /// Seed think-time jitter for reproducible runs
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the orchestrator
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails or the HTTP
    /// client cannot be constructed.
    pub fn build(self) -> Result<Orchestrator> {
        self.config.validate()?;

        let executor: Arc<dyn RequestExecutor> = match self.executor {
            Some(executor) => executor,
            None => Arc::new(HttpExecutor::from_config(&self.config)?),
        };

        Ok(Orchestrator {
            config: self.config,
            executor,
            progress_period: self.progress_period,
            progress_bar: self.progress_bar,
            seed: self.seed,
            cancel: CancellationToken::new(),
        })
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
