//! CLI argument parsing and command handling

mod profiles;
mod prompt;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use loadpace_core::{LoadTestConfig, OrchestratorBuilder};
use loadpace_report::{format_number, render_json, render_report};

use profiles::Profile;

/// loadpace - rate-paced HTTP load generator
///
/// Only test systems you own or are explicitly authorized to test.
#[derive(Parser, Debug)]
#[command(name = "loadpace")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Target URL to test
    #[arg(short, long, env = "LOADPACE_URL")]
    pub url: Option<String>,

    /// Use a predefined profile: normal, peak, flash-sale, stress
    #[arg(short, long, value_parser = profiles::parse_profile)]
    pub profile: Option<&'static Profile>,

    /// Total number of requests [default: 100]
    #[arg(short = 'n', long)]
    pub requests: Option<u64>,

    /// Target requests per second [default: 10]
    #[arg(short, long)]
    pub rps: Option<u32>,

    /// Number of concurrent workers [default: 5]
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Request timeout in seconds
    #[arg(short, long, default_value = "30")]
    pub timeout: u64,

    /// Pause between a worker's requests in milliseconds [default: 100]
    #[arg(long)]
    pub think_time: Option<u64>,

    /// Skip the authorization prompt (use only for your own systems)
    #[arg(long)]
    pub authorized: bool,

    /// Disable the live progress line
    #[arg(long)]
    pub no_progress: bool,

    /// List available test profiles and exit
    #[arg(long)]
    pub list_profiles: bool,

    /// Print the final results as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Build the run configuration
    ///
    /// Flags given explicitly win; a profile fills in the rest; built-in
    /// defaults cover whatever neither sets.
    pub fn load_test_config(&self) -> LoadTestConfig {
        let defaults = LoadTestConfig::default();
        let profile = self.profile;

        LoadTestConfig {
            target: self.url.clone().unwrap_or_default(),
            requests: self
                .requests
                .or(profile.map(|p| p.requests))
                .unwrap_or(defaults.requests),
            rate: self.rps.or(profile.map(|p| p.rps)).unwrap_or(defaults.rate),
            concurrency: self
                .concurrency
                .or(profile.map(|p| p.concurrency))
                .unwrap_or(defaults.concurrency),
            timeout: Duration::from_secs(self.timeout),
            think_time: self
                .think_time
                .or(profile.map(|p| p.think_time_ms))
                .map(Duration::from_millis)
                .unwrap_or(defaults.think_time),
            show_progress: !self.no_progress,
        }
    }

    /// Run the command
    pub async fn run(&self) -> Result<ExitCode> {
        let mut stdout = io::stdout().lock();

        if self.list_profiles {
            profiles::write_catalog(&mut stdout)?;
            return Ok(ExitCode::SUCCESS);
        }

        if self.url.is_none() && self.profile.is_none() {
            profiles::write_catalog(&mut stdout)?;
            writeln!(stdout, "Use loadpace --help for more configuration information.\n")?;
            return Ok(ExitCode::FAILURE);
        }

        let config = self.load_test_config();
        config.validate().context("Invalid configuration")?;

        drop(stdout);

        // Keep stdout clean for the JSON document.
        let mut info: Box<dyn Write> = if self.json {
            Box::new(io::stderr())
        } else {
            Box::new(io::stdout())
        };

        prompt::write_warning(&mut info)?;
        if !self.authorized {
            let confirmed = prompt::confirm(&mut io::stdin().lock(), &mut info)
                .context("Failed to read confirmation")?;
            if !confirmed {
                writeln!(info, "Load test cancelled.")?;
                return Ok(ExitCode::SUCCESS);
            }
        }

        self.write_test_info(&mut info, &config)?;
        info.flush()?;

        let orchestrator = OrchestratorBuilder::new()
            .config(config.clone())
            .build()
            .context("Failed to set up load test")?;

        let summary = orchestrator
            .run_with_signal_handling()
            .await
            .context("Load test failed")?;

        if summary.was_interrupted(config.requests) {
            tracing::warn!(
                completed = summary.stats.total,
                planned = config.requests,
                "Load test interrupted before all requests were sent"
            );
        }

        if self.json {
            let json = render_json(&summary.stats, &config).context("Failed to serialize results")?;
            println!("{json}");
        } else {
            println!("\n");
            println!("{}", render_report(&summary.stats, &config));
        }

        Ok(ExitCode::SUCCESS)
    }

    fn write_test_info(&self, out: &mut impl Write, config: &LoadTestConfig) -> io::Result<()> {
        let rule = "-".repeat(80);
        writeln!(out, "\n🚀 Starting Load Test")?;
        writeln!(out, "{rule}")?;

        if let Some(profile) = self.profile {
            writeln!(out, "Profile:            {} - {}", profile.name, profile.description)?;
        }

        let estimated = config.estimated_duration().as_secs_f64();
        writeln!(out, "Target:             {}", config.target)?;
        writeln!(out, "Total Requests:     {}", format_number(config.requests))?;
        writeln!(out, "Concurrent Users:   {}", config.concurrency)?;
        writeln!(out, "Max RPS:            {} req/sec", config.rate)?;
        writeln!(out, "Think Time:         {:?}", config.think_time)?;
        writeln!(out, "Timeout:            {:?}", config.timeout)?;
        writeln!(
            out,
            "Estimated Duration: {:.1} seconds ({:.1} minutes)",
            estimated,
            estimated / 60.0
        )?;
        writeln!(out, "{rule}")?;
        writeln!(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["loadpace"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--url", "http://localhost:8080/"]);
        let config = cli.load_test_config();

        assert_eq!(config.target, "http://localhost:8080/");
        assert_eq!(config.requests, 100);
        assert_eq!(config.rate, 10);
        assert_eq!(config.concurrency, 5);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.think_time, Duration::from_millis(100));
        assert!(config.show_progress);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_profile_fills_unset_flags() {
        let cli = parse(&["--url", "http://localhost/", "--profile", "peak"]);
        let config = cli.load_test_config();

        assert_eq!(config.requests, 100_000);
        assert_eq!(config.rate, 500);
        assert_eq!(config.concurrency, 200);
        assert_eq!(config.think_time, Duration::from_millis(300));
    }

    #[test]
    fn test_explicit_flags_beat_profile() {
        let cli = parse(&[
            "--url",
            "http://localhost/",
            "--profile",
            "stress",
            "--requests",
            "50",
            "--think-time",
            "0",
            "--no-progress",
        ]);
        let config = cli.load_test_config();

        assert_eq!(config.requests, 50);
        assert_eq!(config.think_time, Duration::ZERO);
        assert_eq!(config.rate, 5_000);
        assert_eq!(config.concurrency, 2_000);
        assert!(!config.show_progress);
    }

    #[test]
    fn test_unknown_profile_rejected() {
        let err = Cli::try_parse_from(["loadpace", "--profile", "burst"]).unwrap_err();
        assert!(err.to_string().contains("unknown profile 'burst'"));
    }

    #[test]
    fn test_profile_without_url_fails_validation() {
        let mut cli = parse(&["--profile", "normal"]);
        // LOADPACE_URL may be set in the test environment.
        cli.url = None;

        let config = cli.load_test_config();
        assert!(config.target.is_empty());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_write_test_info() {
        let cli = parse(&["--url", "http://localhost/", "--profile", "normal"]);
        let config = cli.load_test_config();

        let mut out = Vec::new();
        cli.write_test_info(&mut out, &config).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(
            text.contains("Profile:            Normal Traffic - Regular daily traffic pattern")
        );
        assert!(text.contains("Total Requests:     10,000"));
        assert!(text.contains("Think Time:         500ms"));
        assert!(text.contains("Estimated Duration: 100.0 seconds (1.7 minutes)"));
    }
}
