//! Orchestrator execution logic

use indicatif::ProgressBar;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::channel::permit_queue;
use crate::config::LoadTestConfig;
use crate::error::{Error, Result};
use crate::metrics::{RunStats, StatsSnapshot};
use crate::progress::ProgressReporter;
use crate::traits::RequestExecutor;
use crate::worker::{RequestRateLimiter, WorkerBuilder, WorkerStats};

use super::aggregator::aggregate_worker_stats;

/// Outcome of one load test run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Final, finalized statistics
    pub stats: StatsSnapshot,

    /// Counts returned by each worker that exited normally
    pub workers: Vec<WorkerStats>,

    /// Permits the rate limiter issued before closing the queue
    pub permits_issued: u64,
}

impl RunSummary {
    /// Whether the run stopped before every planned request was executed
    pub fn was_interrupted(&self, planned: u64) -> bool {
        self.stats.total < planned
    }
}

/// Orchestrator manages the load test lifecycle
///
/// Responsible for creating the run statistics, starting the reporter and
/// the workers, driving the rate limiter and collecting results. An
/// orchestrator runs once: its cancellation token is fired when `run`
/// returns.
pub struct Orchestrator {
    /// Validated run configuration
    pub(crate) config: LoadTestConfig,

    /// Request executor (shared across workers)
    pub(crate) executor: Arc<dyn RequestExecutor>,

    /// Progress refresh period
    pub(crate) progress_period: Duration,

    /// Bar to draw progress into instead of stderr
    pub(crate) progress_bar: Option<ProgressBar>,

    /// Base seed for think-time jitter
    pub(crate) seed: Option<u64>,

    /// Shutdown signal for workers, dispatcher and reporter
    pub(crate) cancel: CancellationToken,
}

impl Orchestrator {
    /// Get a handle that stops the run when cancelled
    pub fn shutdown_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Trigger shutdown of the run
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Get the run configuration
    pub fn config(&self) -> &LoadTestConfig {
        &self.config
    }

    /// Run the load test
    ///
    /// Spawns the workers, dispatches permits at the configured rate, waits
    /// for every worker, then finalizes and returns the statistics. On
    /// cancellation the returned snapshot covers only the requests that
    /// were executed.
    pub async fn run(self) -> Result<RunSummary> {
        // Fires on every exit path, including `?` and a dropped future.
        let _guard = self.cancel.clone().drop_guard();

        let planned = self.config.requests;
        let concurrency = self.config.concurrency;
        let stats = Arc::new(RunStats::new());

        tracing::info!(
            target_url = %self.config.target,
            requests = planned,
            rate = self.config.rate,
            concurrency,
            think_time_ms = self.config.think_time.as_millis() as u64,
            executor = self.executor.name(),
            "Starting load test"
        );

        let reporter = if self.config.show_progress {
            let token = self.cancel.child_token();
            let mut reporter = ProgressReporter::new(Arc::clone(&stats), planned)
                .with_period(self.progress_period);
            if let Some(bar) = self.progress_bar.clone() {
                reporter = reporter.with_bar(bar);
            }
            Some((reporter.spawn(token.clone()), token))
        } else {
            None
        };

        let (sender, queue) = permit_queue(planned);
        let tracker = TaskTracker::new();
        let mut handles = Vec::with_capacity(concurrency);

        for worker_id in 0..concurrency {
            let worker = WorkerBuilder::new(worker_id)
                .executor(Arc::clone(&self.executor))
                .stats(Arc::clone(&stats))
                .permits(queue.clone())
                .think_time(self.config.think_time)
                .seed(self.seed)
                .build()?;

            handles.push(tracker.spawn(worker.run(self.cancel.clone())));
        }
        drop(queue);
        tracker.close();

        let limiter = RequestRateLimiter::new(self.config.rate);
        let permits_issued = limiter.dispatch(planned, sender, &self.cancel).await;

        tracker.wait().await;

        let mut workers = Vec::with_capacity(handles.len());
        let mut worker_failures = 0;
        for (idx, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(worker_stats) => workers.push(worker_stats),
                Err(e) => {
                    worker_failures += 1;
                    tracing::error!(worker_id = idx, error = %e, "Worker task panicked");
                }
            }
        }

        stats.finish();

        if let Some((handle, token)) = reporter {
            token.cancel();
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Progress reporter did not shut down cleanly");
            }
        }

        if workers.is_empty() && worker_failures > 0 {
            return Err(Error::worker(format!(
                "All {} workers failed to complete",
                worker_failures
            )));
        }

        let snapshot = stats.snapshot();
        let aggregated = aggregate_worker_stats(&workers);
        tracing::debug!(
            workers = aggregated.total_workers,
            longest_worker_secs = aggregated.total_duration.as_secs_f64(),
            worker_rps = aggregated.requests_per_second,
            worker_success_rate = aggregated.success_rate(),
            "Worker totals"
        );
        if worker_failures == 0 && !aggregated.agrees_with(&snapshot) {
            tracing::warn!(
                worker_total = aggregated.total_requests(),
                run_total = snapshot.total,
                "Worker counts disagree with run statistics"
            );
        }

        tracing::info!(
            elapsed_secs = snapshot.elapsed.as_secs_f64(),
            total = snapshot.total,
            succeeded = snapshot.succeeded,
            failed = snapshot.failed,
            permits_issued,
            rps = snapshot.requests_per_second(),
            "Load test completed"
        );

        Ok(RunSummary {
            stats: snapshot,
            workers,
            permits_issued,
        })
    }

    /// Run with Ctrl+C signal handling
    ///
    /// Ctrl+C fires the same token as [`shutdown`](Self::shutdown).
    pub async fn run_with_signal_handling(self) -> Result<RunSummary> {
        let cancel = self.cancel.clone();

        let signal_handle = tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
                    cancel.cancel();
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                }
            }
        });

        let result = self.run().await;

        signal_handle.abort();

        result
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("executor", &self.executor.name())
            .field("progress_period", &self.progress_period)
            .field("seed", &self.seed)
            .finish()
    }
}
