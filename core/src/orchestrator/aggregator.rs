//! Result aggregation from multiple workers

use std::time::Duration;

use crate::metrics::StatsSnapshot;
use crate::worker::WorkerStats;

/// Per-worker counts folded together
///
/// Built independently of the shared run statistics so the two can be
/// cross-checked once every worker has been joined.
#[derive(Debug, Clone, Default)]
pub struct AggregatedStats {
    /// Number of workers that completed
    pub total_workers: usize,

    /// Total successful requests
    pub succeeded: u64,

    /// Total failed requests
    pub failed: u64,

    /// Longest active span of any worker
    pub total_duration: Duration,

    /// Requests per second over that span
    pub requests_per_second: f64,
}

impl AggregatedStats {
    /// Get the total number of requests (succeeded + failed)
    pub fn total_requests(&self) -> u64 {
        self.succeeded + self.failed
    }

    /// Get the success rate (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        let total = self.total_requests();
        if total > 0 {
            self.succeeded as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Whether the worker counts match a snapshot of the shared statistics
    pub fn agrees_with(&self, snapshot: &StatsSnapshot) -> bool {
        self.succeeded == snapshot.succeeded
            && self.failed == snapshot.failed
            && self.total_requests() == snapshot.total
    }
}

/// Aggregate statistics from multiple workers
pub fn aggregate_worker_stats(stats: &[WorkerStats]) -> AggregatedStats {
    if stats.is_empty() {
        return AggregatedStats::default();
    }

    let succeeded: u64 = stats.iter().map(|s| s.succeeded).sum();
    let failed: u64 = stats.iter().map(|s| s.failed).sum();

    // Use the maximum elapsed time across all workers
    let total_duration = stats
        .iter()
        .filter_map(|s| s.elapsed())
        .max()
        .unwrap_or(Duration::ZERO);

    let secs = total_duration.as_secs_f64();
    let requests_per_second = if secs > 0.0 {
        (succeeded + failed) as f64 / secs
    } else {
        0.0
    };

    AggregatedStats {
        total_workers: stats.len(),
        succeeded,
        failed,
        total_duration,
        requests_per_second,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::RunStats;
    use crate::response::RequestOutcome;

    fn worker(id: usize, succeeded: u64, failed: u64) -> WorkerStats {
        let mut stats = WorkerStats::new(id);
        stats.succeeded = succeeded;
        stats.failed = failed;
        stats
    }

    #[test]
    fn test_aggregate_empty() {
        let aggregated = aggregate_worker_stats(&[]);
        assert_eq!(aggregated.total_workers, 0);
        assert_eq!(aggregated.total_requests(), 0);
        assert_eq!(aggregated.success_rate(), 0.0);
    }

    #[test]
    fn test_aggregate_sums_workers() {
        let aggregated =
            aggregate_worker_stats(&[worker(0, 10, 2), worker(1, 7, 1), worker(2, 0, 0)]);
        assert_eq!(aggregated.total_workers, 3);
        assert_eq!(aggregated.succeeded, 17);
        assert_eq!(aggregated.failed, 3);
        assert!((aggregated.success_rate() - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_uses_longest_worker_span() {
        let now = std::time::Instant::now();
        let mut short = worker(0, 4, 0);
        short.started_at = Some(now);
        short.ended_at = Some(now + Duration::from_secs(1));
        let mut long = worker(1, 5, 1);
        long.started_at = Some(now);
        long.ended_at = Some(now + Duration::from_secs(2));

        let aggregated = aggregate_worker_stats(&[short, long, worker(2, 0, 0)]);
        assert_eq!(aggregated.total_duration, Duration::from_secs(2));
        assert!((aggregated.requests_per_second - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_without_spans_has_no_rate() {
        let aggregated = aggregate_worker_stats(&[worker(0, 3, 0)]);
        assert_eq!(aggregated.total_duration, Duration::ZERO);
        assert_eq!(aggregated.requests_per_second, 0.0);
    }

    #[test]
    fn test_agrees_with_snapshot() {
        let run = RunStats::new();
        run.record_outcome(&RequestOutcome::from_status(200, Duration::from_millis(1)));
        run.record_outcome(&RequestOutcome::transport_failure());
        let snapshot = run.snapshot();

        assert!(aggregate_worker_stats(&[worker(0, 1, 0), worker(1, 0, 1)]).agrees_with(&snapshot));
        assert!(!aggregate_worker_stats(&[worker(0, 2, 0)]).agrees_with(&snapshot));
    }
}
