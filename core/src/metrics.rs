//! Run statistics shared by every worker
//!
//! [`RunStats`] is the only structure mutated concurrently during a run.
//! Every field is an independent atomic, and the status-code mapping is a
//! sharded map of atomic counters, so workers never serialize through a
//! single lock. Fields are individually atomic but not transactionally
//! consistent with each other: mid-run, `total` and the status map may
//! disagree by a few counts. They agree once all workers have stopped.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use crate::response::{OutcomeClass, RequestOutcome};

/// Min-latency value meaning "nothing recorded yet"
const UNSET_MIN: u64 = u64::MAX;

/// Concurrency-safe running statistics for one load test run
#[derive(Debug)]
pub struct RunStats {
    total: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    min_latency_ms: AtomicU64,
    max_latency_ms: AtomicU64,
    latency_sum_ms: AtomicU64,
    latency_samples: AtomicU64,
    status_codes: DashMap<u16, AtomicU64>,
    started: Instant,
    started_at: DateTime<Utc>,
    ended: OnceLock<(Instant, DateTime<Utc>)>,
}

impl RunStats {
    /// Create empty statistics; the start timestamp is taken now
    pub fn new() -> Self {
        Self {
            total: AtomicU64::new(0),
            succeeded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            min_latency_ms: AtomicU64::new(UNSET_MIN),
            max_latency_ms: AtomicU64::new(0),
            latency_sum_ms: AtomicU64::new(0),
            latency_samples: AtomicU64::new(0),
            status_codes: DashMap::new(),
            started: Instant::now(),
            started_at: Utc::now(),
            ended: OnceLock::new(),
        }
    }

    /// Fold one request outcome into the statistics
    pub fn record_outcome(&self, outcome: &RequestOutcome) {
        // `total` leads the class counters so a reader that loads the class
        // counters first never sees them sum past `total`.
        self.total.fetch_add(1, Ordering::Relaxed);
        match outcome.class {
            OutcomeClass::Success => self.succeeded.fetch_add(1, Ordering::Release),
            OutcomeClass::Failure => self.failed.fetch_add(1, Ordering::Release),
        };

        if let Some(latency_ms) = outcome.latency_ms() {
            self.record_latency(latency_ms);
        }

        self.increment_status(outcome.status.code());
    }

    fn record_latency(&self, latency_ms: u64) {
        self.latency_sum_ms.fetch_add(latency_ms, Ordering::Relaxed);
        self.latency_samples.fetch_add(1, Ordering::Relaxed);

        // CAS loops: give up as soon as the stored extremum already bounds us.
        // Max is settled before min is published, so a visible min is never
        // above the visible max.
        let mut current = self.max_latency_ms.load(Ordering::Relaxed);
        while latency_ms > current {
            match self.max_latency_ms.compare_exchange_weak(
                current,
                latency_ms,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }

        let mut current = self.min_latency_ms.load(Ordering::Relaxed);
        while latency_ms < current {
            match self.min_latency_ms.compare_exchange_weak(
                current,
                latency_ms,
                Ordering::Release,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }
    }

    fn increment_status(&self, code: u16) {
        if let Some(counter) = self.status_codes.get(&code) {
            counter.fetch_add(1, Ordering::Relaxed);
            return;
        }
        self.status_codes
            .entry(code)
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Total requests recorded so far
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Set the end timestamp. Only the first call has an effect.
    pub fn finish(&self) {
        let _ = self.ended.set((Instant::now(), Utc::now()));
    }

    /// Whether [`finish`](Self::finish) has been called
    pub fn is_finished(&self) -> bool {
        self.ended.get().is_some()
    }

    /// Time since the run started, or the run's duration once finished
    pub fn elapsed(&self) -> Duration {
        match self.ended.get() {
            Some((end, _)) => end.duration_since(self.started),
            None => self.started.elapsed(),
        }
    }

    /// Field-atomic point-in-time copy of the statistics
    pub fn snapshot(&self) -> StatsSnapshot {
        // Class counters before `total`, min before max: each pairs with the
        // write order in `record_outcome`.
        let succeeded = self.succeeded.load(Ordering::Acquire);
        let failed = self.failed.load(Ordering::Acquire);
        let total = self.total.load(Ordering::Relaxed);

        let min = self.min_latency_ms.load(Ordering::Acquire);
        let samples = self.latency_samples.load(Ordering::Relaxed);
        let sum = self.latency_sum_ms.load(Ordering::Relaxed);

        let (min_latency_ms, max_latency_ms) = if min == UNSET_MIN {
            (None, None)
        } else {
            (Some(min), Some(self.max_latency_ms.load(Ordering::Relaxed)))
        };

        let status_codes = self
            .status_codes
            .iter()
            .map(|entry| (*entry.key(), entry.value().load(Ordering::Relaxed)))
            .collect();

        StatsSnapshot {
            total,
            succeeded,
            failed,
            min_latency_ms,
            max_latency_ms,
            latency_sum_ms: sum,
            latency_samples: samples,
            status_codes,
            started_at: self.started_at,
            ended_at: self.ended.get().map(|(_, at)| *at),
            elapsed: self.elapsed(),
        }
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`RunStats`]
///
/// Used for progress display during the run and, once the run has
/// finished, as the final result handed to the report formatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Requests recorded
    pub total: u64,
    /// Requests classified as success
    pub succeeded: u64,
    /// Requests classified as failure
    pub failed: u64,
    /// Smallest recorded latency; `None` until a latency is recorded
    pub min_latency_ms: Option<u64>,
    /// Largest recorded latency; `None` until a latency is recorded
    pub max_latency_ms: Option<u64>,
    /// Sum of recorded latencies
    pub latency_sum_ms: u64,
    /// Number of recorded latencies (transport failures carry none)
    pub latency_samples: u64,
    /// Occurrences per status code (`0` = transport failure)
    pub status_codes: BTreeMap<u16, u64>,
    /// Wall-clock start of the run
    pub started_at: DateTime<Utc>,
    /// Wall-clock end of the run, once finalized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    /// Elapsed time at snapshot (full duration once finalized)
    pub elapsed: Duration,
}

impl StatsSnapshot {
    /// Mean of recorded latencies
    pub fn mean_latency_ms(&self) -> Option<f64> {
        if self.latency_samples == 0 {
            None
        } else {
            Some(self.latency_sum_ms as f64 / self.latency_samples as f64)
        }
    }

    /// Achieved rate over the elapsed time
    pub fn requests_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total as f64 / secs
        } else {
            0.0
        }
    }

    /// Success rate (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.total as f64
        }
    }

    /// Sum of all status-code counts
    pub fn status_total(&self) -> u64 {
        self.status_codes.values().sum()
    }

    /// Count for one status code
    pub fn status_count(&self, code: u16) -> u64 {
        self.status_codes.get(&code).copied().unwrap_or(0)
    }
}
