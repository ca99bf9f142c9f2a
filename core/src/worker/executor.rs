//! Worker execution loop

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::channel::PermitQueue;
use crate::metrics::RunStats;
use crate::traits::RequestExecutor;

use super::stats::WorkerStats;
use super::think_time::ThinkTime;

/// Worker executes requests in a loop: take permit -> execute -> record -> pause
///
/// Workers are tokio tasks managed by the Orchestrator. They share the
/// executor, the permit queue and the run statistics; the only state they
/// own is their jitter source and their [`WorkerStats`].
pub struct Worker {
    /// Unique worker identifier
    id: usize,

    /// Request executor (shared across workers via Arc)
    executor: Arc<dyn RequestExecutor>,

    /// Shared run statistics
    stats: Arc<RunStats>,

    /// Shared permit queue
    permits: PermitQueue,

    /// Pause after each request
    think_time: ThinkTime,
}

impl Worker {
    /// Create a new worker
    pub fn new(
        id: usize,
        executor: Arc<dyn RequestExecutor>,
        stats: Arc<RunStats>,
        permits: PermitQueue,
        think_time: ThinkTime,
    ) -> Self {
        Self {
            id,
            executor,
            stats,
            permits,
            think_time,
        }
    }

    /// Run the worker loop
    ///
    /// Returns when the permit queue is closed and drained, or when `cancel`
    /// fires. A request already in flight is allowed to complete and is
    /// recorded; no new request starts after cancellation is observed.
    pub async fn run(mut self, cancel: CancellationToken) -> WorkerStats {
        let mut stats = WorkerStats::new(self.id);
        stats.start();

        tracing::debug!(worker_id = self.id, executor = self.executor.name(), "Worker started");

        loop {
            let permit = tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    tracing::debug!(worker_id = self.id, "Worker received shutdown signal");
                    break;
                }

                permit = self.permits.next() => permit,
            };

            let Some(permit) = permit else {
                tracing::debug!(worker_id = self.id, "Permit queue drained, worker stopping");
                break;
            };

            if cancel.is_cancelled() {
                tracing::debug!(
                    worker_id = self.id,
                    permit = permit.sequence(),
                    "Shutdown after permit taken, skipping request"
                );
                break;
            }

            let outcome = self.executor.execute().await;
            self.stats.record_outcome(&outcome);
            stats.record(&outcome);

            tracing::trace!(
                worker_id = self.id,
                permit = permit.sequence(),
                status = %outcome.status,
                latency_ms = ?outcome.latency_ms(),
                "Request recorded"
            );

            let pause = self.think_time.next();
            if !pause.is_zero() {
                tokio::select! {
                    biased;

                    _ = cancel.cancelled() => {
                        tracing::debug!(worker_id = self.id, "Worker received shutdown signal");
                        break;
                    }

                    _ = tokio::time::sleep(pause) => {}
                }
            }
        }

        stats.stop();
        tracing::debug!(
            worker_id = self.id,
            succeeded = stats.succeeded,
            failed = stats.failed,
            elapsed_ms = ?stats.elapsed().map(|d| d.as_millis()),
            "Worker finished"
        );

        stats
    }

    /// Get the worker ID
    pub fn id(&self) -> usize {
        self.id
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("executor", &self.executor.name())
            .field("think_time", &self.think_time.base())
            .finish()
    }
}
