//! Post-run performance assessment

use serde::Serialize;
use std::fmt;

use loadpace_core::{LoadTestConfig, StatsSnapshot};

/// Achieved rate below this share of the target is flagged
pub const RATE_SHORTFALL_RATIO: f64 = 0.8;

/// Mean latency above this is flagged
pub const HIGH_LATENCY_MS: f64 = 2000.0;

/// Overall grade from the success rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    /// At least 99.5% success
    Excellent,
    /// At least 95% success
    Good,
    /// At least 90% success
    Fair,
    /// Below 90% success
    Poor,
}

impl Grade {
    /// Grade a success rate given in percent
    pub fn from_success_percent(percent: f64) -> Self {
        if percent >= 99.5 {
            Grade::Excellent
        } else if percent >= 95.0 {
            Grade::Good
        } else if percent >= 90.0 {
            Grade::Fair
        } else {
            Grade::Poor
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Grade::Excellent => "✅ Excellent - System handled load very well",
            Grade::Good => "✓ Good - System performed adequately",
            Grade::Fair => "⚠️  Fair - Some issues detected, investigate errors",
            Grade::Poor => "❌ Poor - Significant issues, system may be overloaded",
        };
        f.write_str(text)
    }
}

/// Additional warning raised by the assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    /// Achieved rate fell well short of the target
    RateShortfall,
    /// Mean latency is high
    HighLatency,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Advisory::RateShortfall => {
                "⚠️  Could not achieve target RPS - system may be bottlenecked"
            }
            Advisory::HighLatency => "⚠️  High average latency - check server performance",
        };
        f.write_str(text)
    }
}

/// Grade plus advisories for a finished run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    /// Success-rate grade
    pub grade: Grade,
    /// Warnings in display order
    pub advisories: Vec<Advisory>,
}

/// Assess a finished run against its configuration
pub fn assess(stats: &StatsSnapshot, config: &LoadTestConfig) -> Assessment {
    let grade = Grade::from_success_percent(stats.success_rate() * 100.0);

    let mut advisories = Vec::new();
    if stats.requests_per_second() < f64::from(config.rate) * RATE_SHORTFALL_RATIO {
        advisories.push(Advisory::RateShortfall);
    }
    if stats.mean_latency_ms().is_some_and(|mean| mean > HIGH_LATENCY_MS) {
        advisories.push(Advisory::HighLatency);
    }

    Assessment { grade, advisories }
}
