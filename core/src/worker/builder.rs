//! Builder pattern for Worker construction

use crate::channel::PermitQueue;
use crate::error::{Error, Result};
use crate::metrics::RunStats;
use crate::traits::RequestExecutor;

use super::executor::Worker;
use super::think_time::ThinkTime;

use std::sync::Arc;
use std::time::Duration;

/// Builder for creating Worker instances
///
/// # Example
/// ```ignore
/// let worker = WorkerBuilder::new(0)
///     .executor(executor)
///     .stats(stats)
///     .permits(queue)
///     .think_time(Duration::from_millis(100))
///     .build()?;
/// ```
pub struct WorkerBuilder {
    id: usize,
    executor: Option<Arc<dyn RequestExecutor>>,
    stats: Option<Arc<RunStats>>,
    permits: Option<PermitQueue>,
    think_time: Duration,
    seed: Option<u64>,
}

impl WorkerBuilder {
    /// Create a new builder with the given worker ID
    pub fn new(id: usize) -> Self {
        Self {
            id,
            executor: None,
            stats: None,
            permits: None,
            think_time: Duration::ZERO,
            seed: None,
        }
    }

    /// Set the request executor
    pub fn executor(mut self, executor: Arc<dyn RequestExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Set the shared run statistics
    pub fn stats(mut self, stats: Arc<RunStats>) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Set the permit queue
    pub fn permits(mut self, permits: PermitQueue) -> Self {
        self.permits = Some(permits);
        self
    }

    /// Set the nominal think-time (default: none)
    pub fn think_time(mut self, think_time: Duration) -> Self {
        self.think_time = think_time;
        self
    }

    /// Seed the jitter source
    ///
    /// The worker ID is mixed in so workers sharing a seed still draw
    /// different sequences.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Build the Worker
    ///
    /// # Errors
    /// Returns an error if any required field is missing.
    pub fn build(self) -> Result<Worker> {
        let executor = self.executor.ok_or(Error::missing_config("executor"))?;
        let stats = self.stats.ok_or(Error::missing_config("stats"))?;
        let permits = self.permits.ok_or(Error::missing_config("permits"))?;

        let think_time = match self.seed {
            Some(seed) => ThinkTime::seeded(self.think_time, seed.wrapping_add(self.id as u64)),
            None => ThinkTime::new(self.think_time),
        };

        Ok(Worker::new(self.id, executor, stats, permits, think_time))
    }
}
