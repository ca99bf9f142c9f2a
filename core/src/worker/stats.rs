//! Worker statistics tracking

use serde::Serialize;
use std::time::{Duration, Instant};

use crate::response::RequestOutcome;

/// Statistics tracked by each worker
///
/// Owned by a single worker task and returned when it exits, so the sum over
/// all workers can be checked against the shared [`RunStats`](crate::metrics::RunStats).
#[derive(Debug, Default, Clone, Serialize)]
pub struct WorkerStats {
    /// Worker identifier
    pub worker_id: usize,

    /// Requests classified as success
    pub succeeded: u64,

    /// Requests classified as failure
    pub failed: u64,

    /// Worker start time
    #[serde(skip)]
    pub started_at: Option<Instant>,

    /// Worker end time
    #[serde(skip)]
    pub ended_at: Option<Instant>,
}

impl WorkerStats {
    /// Create empty stats for a worker
    pub fn new(worker_id: usize) -> Self {
        Self {
            worker_id,
            ..Self::default()
        }
    }

    /// Start tracking (records start time)
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Stop tracking (records end time)
    pub fn stop(&mut self) {
        self.ended_at = Some(Instant::now());
    }

    /// Count one outcome
    pub fn record(&mut self, outcome: &RequestOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Total requests executed by this worker
    pub fn total_requests(&self) -> u64 {
        self.succeeded + self.failed
    }

    /// Success rate (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        if self.total_requests() == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.total_requests() as f64
        }
    }

    /// Get elapsed time since start
    pub fn elapsed(&self) -> Option<Duration> {
        self.started_at.map(|start| {
            self.ended_at
                .map(|end| end.duration_since(start))
                .unwrap_or_else(|| start.elapsed())
        })
    }

    /// Get requests per second
    pub fn requests_per_second(&self) -> f64 {
        self.elapsed()
            .map(|d| {
                let secs = d.as_secs_f64();
                if secs > 0.0 {
                    self.total_requests() as f64 / secs
                } else {
                    0.0
                }
            })
            .unwrap_or(0.0)
    }

    /// Merge counts from another worker
    pub fn merge(&mut self, other: &WorkerStats) {
        self.succeeded += other.succeeded;
        self.failed += other.failed;
    }
}
