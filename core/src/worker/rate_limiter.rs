//! Fixed-interval permit dispatch

use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::channel::{PermitError, PermitSender};
use crate::config::MAX_RATE;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Issues permits on a fixed time grid of `1s / rate`
///
/// Ticks are scheduled against the start instant rather than the previous
/// tick, so a late tick fires immediately without shifting the ones after
/// it. Over a run of `N` permits the dispatch span stays close to `N / rate`
/// regardless of scheduler jitter.
pub struct RequestRateLimiter {
    rate: u32,
    interval: Duration,
}

impl RequestRateLimiter {
    /// Create a limiter for `rate` requests per second
    ///
    /// The rate is clamped to `1..=MAX_RATE` so the interval is never zero.
    ///
    /// # Examples
    /// ```
    /// use loadpace_core::worker::RequestRateLimiter;
    /// use std::time::Duration;
    ///
    /// let limiter = RequestRateLimiter::new(100);
    /// assert_eq!(limiter.interval(), Duration::from_millis(10));
    /// ```
    pub fn new(rate: u32) -> Self {
        let rate = rate.clamp(1, MAX_RATE);
        let interval = Duration::from_nanos(NANOS_PER_SEC / u64::from(rate));
        Self { rate, interval }
    }

    /// Requests per second this limiter paces to
    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Spacing between consecutive permits
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Issue up to `total` permits, one per tick, then close the queue
    ///
    /// The first permit is issued one interval after the call. Stops early
    /// when `cancel` fires or when every worker has dropped its end of the
    /// queue. Returns the number of permits issued.
    pub async fn dispatch(
        &self,
        total: u64,
        mut sender: PermitSender,
        cancel: &CancellationToken,
    ) -> u64 {
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

        tracing::debug!(
            permits = total,
            rate = self.rate,
            interval_us = self.interval.as_micros() as u64,
            "Dispatch started"
        );

        while sender.issued() < total {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    tracing::debug!(issued = sender.issued(), "Dispatch cancelled");
                    break;
                }

                _ = ticker.tick() => {
                    match sender.issue() {
                        Ok(_) => {}
                        Err(PermitError::Full) => {
                            // Capacity matches the permit count; only reachable
                            // with an undersized queue.
                            tracing::warn!(
                                issued = sender.issued(),
                                "Permit queue full, dropping tick"
                            );
                        }
                        Err(PermitError::Closed) => {
                            tracing::warn!(
                                issued = sender.issued(),
                                "All workers exited, stopping dispatch"
                            );
                            break;
                        }
                    }
                }
            }
        }

        let issued = sender.issued();
        sender.close();
        tracing::debug!(issued, "Dispatch finished, queue closed");
        issued
    }
}

impl std::fmt::Debug for RequestRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestRateLimiter")
            .field("rate", &self.rate)
            .field("interval", &self.interval)
            .finish()
    }
}
