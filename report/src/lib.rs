//! Report generation for load test results
//!
//! This crate turns a finished run's statistics into:
//!
//! - A plain-text results report with a performance assessment
//! - A JSON document for machine consumption

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assessment;
pub mod format;
pub mod text;

use serde::Serialize;

use loadpace_core::{LoadTestConfig, StatsSnapshot};

pub use assessment::{assess, Advisory, Assessment, Grade};
pub use format::{format_duration, format_number, percent};
pub use text::TextReport;

/// Render the plain-text report
pub fn render_report(stats: &StatsSnapshot, config: &LoadTestConfig) -> String {
    TextReport::new(stats, config).to_string()
}

/// JSON view of a finished run
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// Configuration the run used
    pub config: &'a LoadTestConfig,
    /// Final statistics
    pub stats: &'a StatsSnapshot,
    /// Achieved rate
    pub average_rps: f64,
    /// Mean latency over requests that produced one
    pub mean_latency_ms: Option<f64>,
    /// Grade and advisories
    pub assessment: Assessment,
}

impl<'a> JsonReport<'a> {
    /// Build the JSON view
    pub fn new(stats: &'a StatsSnapshot, config: &'a LoadTestConfig) -> Self {
        Self {
            config,
            stats,
            average_rps: stats.requests_per_second(),
            mean_latency_ms: stats.mean_latency_ms(),
            assessment: assess(stats, config),
        }
    }
}

/// Render the JSON report, pretty-printed
pub fn render_json(stats: &StatsSnapshot, config: &LoadTestConfig) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport::new(stats, config))
}
