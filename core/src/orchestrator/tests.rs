//! Tests for the Orchestrator module

use super::aggregator::aggregate_worker_stats;
use super::builder::OrchestratorBuilder;
use super::executor::RunSummary;
use crate::config::LoadTestConfig;
use crate::error::Error;
use crate::response::RequestOutcome;
use crate::traits::RequestExecutor;

use async_trait::async_trait;
use indicatif::ProgressBar;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Mock RequestExecutor
// ============================================================================

struct MockExecutor {
    status: u16,
    delay: Option<Duration>,
    fail_every: Option<usize>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockExecutor {
    fn new() -> Self {
        Self {
            status: 200,
            delay: None,
            fail_every: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn with_fail_every(mut self, n: usize) -> Self {
        self.fail_every = Some(n);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RequestExecutor for MockExecutor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn execute(&self) -> RequestOutcome {
        let count = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        match self.delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let latency = self.delay.unwrap_or(Duration::from_millis(1));
        match self.fail_every {
            Some(n) if count % n == 0 => RequestOutcome::from_status(503, latency),
            _ => RequestOutcome::from_status(self.status, latency),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn quiet_config(requests: u64, rate: u32, concurrency: usize) -> LoadTestConfig {
    LoadTestConfig::new("http://127.0.0.1:9/")
        .with_requests(requests)
        .with_rate(rate)
        .with_concurrency(concurrency)
        .with_think_time(Duration::ZERO)
        .with_progress(false)
}

async fn run_with(config: LoadTestConfig, executor: Arc<MockExecutor>) -> RunSummary {
    OrchestratorBuilder::new()
        .config(config)
        .executor(executor)
        .seed(5)
        .build()
        .expect("Failed to build orchestrator")
        .run()
        .await
        .expect("Run failed")
}

fn assert_consistent(summary: &RunSummary) {
    let stats = &summary.stats;
    assert_eq!(stats.succeeded + stats.failed, stats.total);
    assert_eq!(stats.status_total(), stats.total);
    assert!(stats.ended_at.is_some());

    if let (Some(min), Some(max)) = (stats.min_latency_ms, stats.max_latency_ms) {
        assert!(min <= max);
        let mean = stats.mean_latency_ms().unwrap();
        assert!(min as f64 <= mean && mean <= max as f64);
    }

    assert!(aggregate_worker_stats(&summary.workers).agrees_with(stats));
}

// ============================================================================
// Builder Tests
// ============================================================================

#[test]
fn test_builder_invalid_config() {
    let result = OrchestratorBuilder::new()
        .config(quiet_config(0, 10, 1))
        .executor(Arc::new(MockExecutor::new()))
        .build();

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_builder_rejects_unbounded_concurrency() {
    let result = OrchestratorBuilder::new()
        .config(quiet_config(10, 10, usize::MAX))
        .executor(Arc::new(MockExecutor::new()))
        .build();

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_builder_missing_target() {
    let result = OrchestratorBuilder::new().build();
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_builder_defaults_to_http_executor() {
    let orchestrator = OrchestratorBuilder::new()
        .config(quiet_config(10, 10, 2))
        .build()
        .unwrap();

    let debug = format!("{orchestrator:?}");
    assert!(debug.contains("Orchestrator"));
    assert!(debug.contains("http"));
    assert_eq!(orchestrator.config().requests, 10);
}

// ============================================================================
// Run Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_orchestrator_run_basic() {
    let executor = Arc::new(MockExecutor::new());
    let summary = run_with(quiet_config(20, 1000, 4), executor.clone()).await;

    assert_consistent(&summary);
    assert_eq!(summary.stats.total, 20);
    assert_eq!(summary.stats.succeeded, 20);
    assert_eq!(summary.stats.status_count(200), 20);
    assert_eq!(summary.permits_issued, 20);
    assert_eq!(summary.workers.len(), 4);
    assert_eq!(executor.calls(), 20);
    assert!(!summary.was_interrupted(20));
}

#[tokio::test(start_paused = true)]
async fn test_orchestrator_counts_failures() {
    let executor = Arc::new(MockExecutor::new().with_fail_every(4));
    let summary = run_with(quiet_config(40, 1000, 3), executor).await;

    assert_consistent(&summary);
    assert_eq!(summary.stats.succeeded, 30);
    assert_eq!(summary.stats.failed, 10);
    assert_eq!(summary.stats.status_count(503), 10);
}

#[tokio::test(start_paused = true)]
async fn test_orchestrator_paces_dispatch() {
    let start = tokio::time::Instant::now();
    let summary = run_with(quiet_config(50, 1000, 5), Arc::new(MockExecutor::new())).await;
    let elapsed = start.elapsed();

    assert_eq!(summary.stats.total, 50);
    assert!(elapsed >= Duration::from_millis(50), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(60), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_single_worker_serializes_requests() {
    let executor = Arc::new(MockExecutor::new().with_delay(Duration::from_millis(5)));
    let summary = run_with(quiet_config(30, 1000, 1), executor.clone()).await;

    assert_eq!(summary.stats.total, 30);
    assert_eq!(executor.max_in_flight.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_high_concurrency_totals_match_workers() {
    let executor = Arc::new(MockExecutor::new().with_fail_every(7));
    let summary = run_with(quiet_config(5_000, 100_000, 500), executor.clone()).await;

    assert_consistent(&summary);
    assert_eq!(summary.stats.total, 5_000);
    assert_eq!(summary.workers.len(), 500);
    assert!(executor.max_in_flight.load(Ordering::SeqCst) <= 500);

    let worker_total: u64 = summary.workers.iter().map(|w| w.total_requests()).sum();
    assert_eq!(worker_total, summary.stats.total);
}

#[tokio::test(start_paused = true)]
async fn test_orchestrator_shutdown_mid_run() {
    let orchestrator = OrchestratorBuilder::new()
        .config(quiet_config(1_000, 100, 4))
        .executor(Arc::new(MockExecutor::new()))
        .build()
        .unwrap();

    let handle = orchestrator.shutdown_handle();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(105)).await;
        handle.cancel();
    });

    let summary = orchestrator.run().await.unwrap();

    assert_consistent(&summary);
    assert!(summary.was_interrupted(1_000));
    assert!(summary.stats.total <= summary.permits_issued);
    assert_eq!(summary.permits_issued, 10);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_before_run() {
    let orchestrator = OrchestratorBuilder::new()
        .config(quiet_config(100, 100, 2))
        .executor(Arc::new(MockExecutor::new()))
        .build()
        .unwrap();

    orchestrator.shutdown();
    let summary = orchestrator.run().await.unwrap();

    assert_eq!(summary.stats.total, 0);
    assert_eq!(summary.permits_issued, 0);
    assert_eq!(summary.stats.min_latency_ms, None);
}

#[tokio::test(start_paused = true)]
async fn test_run_cancels_token_on_return() {
    let orchestrator = OrchestratorBuilder::new()
        .config(quiet_config(5, 1000, 1))
        .executor(Arc::new(MockExecutor::new()))
        .build()
        .unwrap();

    let handle = orchestrator.shutdown_handle();
    assert!(!handle.is_cancelled());

    orchestrator.run().await.unwrap();
    assert!(handle.is_cancelled());
}

#[tokio::test(start_paused = true)]
async fn test_progress_final_line() {
    let bar = ProgressBar::hidden();
    let summary = OrchestratorBuilder::new()
        .config(quiet_config(20, 1000, 2).with_progress(true))
        .executor(Arc::new(MockExecutor::new()))
        .progress_period(Duration::from_millis(5))
        .progress_bar(bar.clone())
        .build()
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(summary.stats.total, 20);
    assert!(bar.is_finished());
    assert!(bar.message().starts_with("Progress: 20/20 (100.0%) | Success: 20 | Failed: 0"));
}

// ============================================================================
// HTTP Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_always_ok_target() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .with_status(200)
        .with_body("ok")
        .expect(1_000)
        .create_async()
        .await;

    let config = LoadTestConfig::new(format!("{}/", server.url()))
        .with_requests(1_000)
        .with_rate(500)
        .with_concurrency(20)
        .with_think_time(Duration::ZERO)
        .with_progress(false);

    let summary = OrchestratorBuilder::new().config(config).build().unwrap().run().await.unwrap();

    mock.assert_async().await;
    assert_consistent(&summary);
    assert_eq!(summary.stats.succeeded, 1_000);
    assert_eq!(summary.stats.failed, 0);
    assert_eq!(summary.stats.status_codes.len(), 1);
    assert_eq!(summary.stats.status_count(200), 1_000);
    assert!(summary.stats.elapsed >= Duration::from_millis(1_900));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unreachable_target() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = LoadTestConfig::new(format!("http://127.0.0.1:{port}/"))
        .with_requests(10)
        .with_rate(100)
        .with_concurrency(3)
        .with_timeout(Duration::from_secs(2))
        .with_think_time(Duration::ZERO)
        .with_progress(false);

    let summary = OrchestratorBuilder::new().config(config).build().unwrap().run().await.unwrap();

    assert_consistent(&summary);
    assert_eq!(summary.stats.total, 10);
    assert_eq!(summary.stats.failed, 10);
    assert_eq!(summary.stats.status_codes.len(), 1);
    assert_eq!(summary.stats.status_count(0), 10);
    assert_eq!(summary.stats.min_latency_ms, None);
    assert_eq!(summary.stats.max_latency_ms, None);
    assert_eq!(summary.stats.mean_latency_ms(), None);
}
