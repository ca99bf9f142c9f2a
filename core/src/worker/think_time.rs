//! Jittered pause between requests

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Largest relative deviation from the base think-time
pub const JITTER_FRACTION: f64 = 0.2;

/// Per-worker think-time source
///
/// Each call to [`next`](Self::next) yields the base duration perturbed by a
/// uniform offset within ±20% of the base, never below zero.
#[derive(Debug, Clone)]
pub struct ThinkTime {
    base: Duration,
    rng: StdRng,
}

impl ThinkTime {
    /// Think-time seeded from OS entropy
    pub fn new(base: Duration) -> Self {
        Self {
            base,
            rng: StdRng::from_entropy(),
        }
    }

    /// Think-time with a reproducible jitter sequence
    pub fn seeded(base: Duration, seed: u64) -> Self {
        Self {
            base,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Nominal think-time
    pub fn base(&self) -> Duration {
        self.base
    }

    /// Draw the next pause
    pub fn next(&mut self) -> Duration {
        if self.base.is_zero() {
            return Duration::ZERO;
        }

        let base = self.base.as_secs_f64();
        let offset = self.rng.gen_range(-JITTER_FRACTION..=JITTER_FRACTION) * base;
        Duration::from_secs_f64((base + offset).max(0.0))
    }
}
