//! Predefined traffic profiles

use std::io::{self, Write};

/// A named set of run parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    /// Key used on the command line
    pub key: &'static str,
    /// Display name
    pub name: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Total requests
    pub requests: u64,
    /// Concurrent workers
    pub concurrency: usize,
    /// Target requests per second
    pub rps: u32,
    /// Rough expected duration, informational only
    pub duration_minutes: u32,
    /// Nominal think-time
    pub think_time_ms: u64,
}

/// Profile catalog, in display order
pub const PROFILES: &[Profile] = &[
    Profile {
        key: "normal",
        name: "Normal Traffic",
        description: "Regular daily traffic pattern",
        requests: 10_000,
        concurrency: 50,
        rps: 100,
        duration_minutes: 10,
        think_time_ms: 500,
    },
    Profile {
        key: "peak",
        name: "Peak Hours",
        description: "Evening rush hour traffic",
        requests: 100_000,
        concurrency: 200,
        rps: 500,
        duration_minutes: 30,
        think_time_ms: 300,
    },
    Profile {
        key: "flash-sale",
        name: "Flash Sale",
        description: "High-intensity flash sale event",
        requests: 500_000,
        concurrency: 1_000,
        rps: 2_000,
        duration_minutes: 60,
        think_time_ms: 100,
    },
    Profile {
        key: "stress",
        name: "Stress Test",
        description: "Maximum load to find breaking point",
        requests: 1_000_000,
        concurrency: 2_000,
        rps: 5_000,
        duration_minutes: 120,
        think_time_ms: 50,
    },
];

/// Look up a profile by key
pub fn find(key: &str) -> Option<&'static Profile> {
    PROFILES.iter().find(|p| p.key == key)
}

/// clap value parser for `--profile`
pub fn parse_profile(key: &str) -> Result<&'static Profile, String> {
    find(key).ok_or_else(|| {
        format!("unknown profile '{key}'. Use --list-profiles to see available profiles")
    })
}

/// Print the catalog
pub fn write_catalog(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "\n📋 Available Test Profiles")?;
    writeln!(out, "{}", "=".repeat(80))?;

    for p in PROFILES {
        writeln!(out, "\n🏷️  {} ({})", p.name, p.key)?;
        writeln!(out, "   {}", p.description)?;
        writeln!(out, "   • Requests: {}", loadpace_report::format_number(p.requests))?;
        writeln!(out, "   • Concurrency: {} users", p.concurrency)?;
        writeln!(out, "   • RPS: {} req/sec", p.rps)?;
        writeln!(out, "   • Duration: ~{} minutes", p.duration_minutes)?;
        writeln!(out, "   • Think Time: {}ms", p.think_time_ms)?;
    }

    writeln!(
        out,
        "\n💡 Usage: loadpace --url http://your-site.com \
         --profile [normal,peak,flash-sale,stress]\n"
    )
}
