//! Plain-text results report

use chrono::{DateTime, Local, Utc};
use std::fmt;

use loadpace_core::{LoadTestConfig, StatsSnapshot, TRANSPORT_FAILURE_STATUS};

use crate::assessment::assess;
use crate::format::{format_duration, format_number, percent};

const RULE_WIDTH: usize = 80;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Text report over a finished run, rendered through `Display`
#[derive(Debug, Clone, Copy)]
pub struct TextReport<'a> {
    stats: &'a StatsSnapshot,
    config: &'a LoadTestConfig,
}

impl<'a> TextReport<'a> {
    /// Report over `stats` for a run configured by `config`
    pub fn new(stats: &'a StatsSnapshot, config: &'a LoadTestConfig) -> Self {
        Self { stats, config }
    }
}

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string()
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats;
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "{rule}")?;
        writeln!(f, "📊 LOAD TEST RESULTS")?;
        writeln!(f, "{rule}")?;

        writeln!(f, "\n⏱️  Timing:")?;
        writeln!(f, "   Total Duration:       {}", format_duration(stats.elapsed))?;
        writeln!(f, "   Started:              {}", local_time(stats.started_at))?;
        match stats.ended_at {
            Some(ended) => writeln!(f, "   Ended:                {}", local_time(ended))?,
            None => writeln!(f, "   Ended:                (in progress)")?,
        }

        writeln!(f, "\n📈 Requests:")?;
        writeln!(f, "   Total Requests:       {}", format_number(stats.total))?;
        if stats.total < self.config.requests {
            writeln!(
                f,
                "   Planned:              {} (run stopped early)",
                format_number(self.config.requests)
            )?;
        }
        writeln!(
            f,
            "   Successful:           {} ({:.1}%)",
            format_number(stats.succeeded),
            percent(stats.succeeded, stats.total)
        )?;
        writeln!(
            f,
            "   Failed:               {} ({:.1}%)",
            format_number(stats.failed),
            percent(stats.failed, stats.total)
        )?;

        writeln!(f, "\n⚡ Performance:")?;
        writeln!(
            f,
            "   Average RPS:          {:.2} requests/sec",
            stats.requests_per_second()
        )?;
        writeln!(
            f,
            "   Target RPS:           {} requests/sec",
            format_number(u64::from(self.config.rate))
        )?;
        writeln!(
            f,
            "   Concurrent Users:     {}",
            format_number(self.config.concurrency as u64)
        )?;

        if let (Some(mean), Some(min), Some(max)) =
            (stats.mean_latency_ms(), stats.min_latency_ms, stats.max_latency_ms)
        {
            writeln!(f, "\n⏲️  Latency:")?;
            writeln!(f, "   Average:              {mean:.0}ms")?;
            writeln!(f, "   Min:                  {min}ms")?;
            writeln!(f, "   Max:                  {max}ms")?;
        }

        writeln!(f, "\n📋 HTTP Status Codes:")?;
        for (&code, &count) in &stats.status_codes {
            let label = if code == TRANSPORT_FAILURE_STATUS {
                "0 (no response)".to_string()
            } else {
                code.to_string()
            };
            writeln!(
                f,
                "   {label}: {} ({:.1}%)",
                format_number(count),
                percent(count, stats.total)
            )?;
        }

        writeln!(f, "{rule}")?;

        let assessment = assess(stats, self.config);
        writeln!(f, "\n💡 Performance Assessment:")?;
        writeln!(f, "   {}", assessment.grade)?;
        for advisory in &assessment.advisories {
            writeln!(f, "   {advisory}")?;
        }

        Ok(())
    }
}
