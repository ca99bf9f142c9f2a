//! Live progress reporting
//!
//! The reporter is a pure observer: it reads snapshots of the shared
//! [`RunStats`] on a fixed period and rewrites a single status line in place.
//! It never touches the counters and never delays the workers.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::metrics::{RunStats, StatsSnapshot};

/// Refresh period used when none is configured
pub const DEFAULT_PROGRESS_PERIOD: Duration = Duration::from_secs(2);

/// One rendered progress update
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressLine {
    /// Requests recorded so far
    pub completed: u64,
    /// Requests planned for the run
    pub planned: u64,
    /// Successful requests so far
    pub succeeded: u64,
    /// Failed requests so far
    pub failed: u64,
    /// Achieved rate since the run started
    pub requests_per_second: f64,
}

impl ProgressLine {
    /// Build a line from a snapshot
    pub fn from_snapshot(snapshot: &StatsSnapshot, planned: u64) -> Self {
        Self {
            completed: snapshot.total,
            planned,
            succeeded: snapshot.succeeded,
            failed: snapshot.failed,
            requests_per_second: snapshot.requests_per_second(),
        }
    }

    /// Completed share of the planned requests, in percent
    pub fn percent(&self) -> f64 {
        if self.planned == 0 {
            0.0
        } else {
            self.completed as f64 / self.planned as f64 * 100.0
        }
    }
}

impl fmt::Display for ProgressLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Progress: {}/{} ({:.1}%) | Success: {} | Failed: {} | RPS: {:.1}",
            self.completed,
            self.planned,
            self.percent(),
            self.succeeded,
            self.failed,
            self.requests_per_second
        )
    }
}

/// Periodic progress observer
pub struct ProgressReporter {
    stats: Arc<RunStats>,
    planned: u64,
    period: Duration,
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// Reporter drawing to stderr
    ///
    /// Nothing is drawn when stderr is not a terminal.
    pub fn new(stats: Arc<RunStats>, planned: u64) -> Self {
        Self {
            stats,
            planned,
            period: DEFAULT_PROGRESS_PERIOD,
            bar: None,
        }
    }

    /// Set the refresh period
    pub fn with_period(mut self, period: Duration) -> Self {
        if !period.is_zero() {
            self.period = period;
        }
        self
    }

    /// Draw into an existing bar (e.g. `ProgressBar::hidden()`)
    pub fn with_bar(mut self, bar: ProgressBar) -> Self {
        self.bar = Some(bar);
        self
    }

    /// Refresh period
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run the reporter on its own task until `cancel` fires
    ///
    /// The task resolves to the final line, rendered after cancellation from
    /// the latest snapshot.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<ProgressLine> {
        tokio::spawn(self.run(cancel))
    }

    async fn run(self, cancel: CancellationToken) -> ProgressLine {
        let bar = self
            .bar
            .clone()
            .unwrap_or_else(|| status_line(ProgressDrawTarget::stderr()));

        let mut ticker = time::interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => break,

                _ = ticker.tick() => {
                    let line = self.current_line();
                    bar.set_message(line.to_string());
                }
            }
        }

        let last = self.current_line();
        if bar.is_hidden() {
            tracing::debug!(progress = %last, "Progress reporter stopped");
        }
        bar.finish_with_message(last.to_string());
        last
    }

    fn current_line(&self) -> ProgressLine {
        ProgressLine::from_snapshot(&self.stats.snapshot(), self.planned)
    }
}

impl fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("planned", &self.planned)
            .field("period", &self.period)
            .field("custom_bar", &self.bar.is_some())
            .finish()
    }
}

/// Message-only bar that rewrites one line in place
fn status_line(target: ProgressDrawTarget) -> ProgressBar {
    let bar = ProgressBar::with_draw_target(None, target);
    let style = ProgressStyle::with_template("{wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    bar.set_style(style);
    bar
}
