//! HTTP request executor
//!
//! One GET per call against the configured target, timed from dispatch until
//! the response body has been fully drained. The body is discarded unread;
//! draining it is what returns the connection to the idle pool.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use std::time::{Duration, Instant};

use crate::config::LoadTestConfig;
use crate::error::{Error, Result};
use crate::response::RequestOutcome;
use crate::traits::RequestExecutor;

/// `User-Agent` sent with every request
pub const USER_AGENT_VALUE: &str =
    concat!("loadpace/", env!("CARGO_PKG_VERSION"), " (load testing)");

/// `Accept` sent with every request
pub const ACCEPT_VALUE: &str = "text/html,application/json";

/// How long an idle pooled connection is kept
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Build the HTTP client shared by all workers
///
/// The idle pool holds up to `2 × concurrency` connections per host so that
/// every worker can reuse a warm connection.
pub fn build_client(concurrency: usize, timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(concurrency.saturating_mul(2))
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .build()
        .map_err(Error::Client)
}

/// Advisory logged when the target signals it is shedding load
fn overload_advice(code: u16) -> &'static str {
    if code == 429 {
        "Server rate limiting (429) - consider reducing RPS"
    } else {
        "Service unavailable (503) - server may be overloaded"
    }
}

/// Executes GET requests against a single target
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: Client,
    target: String,
}

impl HttpExecutor {
    /// Create an executor over an existing client
    pub fn new(client: Client, target: impl Into<String>) -> Self {
        Self {
            client,
            target: target.into(),
        }
    }

    /// Create an executor with a client sized for the configured run
    pub fn from_config(config: &LoadTestConfig) -> Result<Self> {
        let client = build_client(config.concurrency, config.timeout)?;
        Ok(Self::new(client, config.target.clone()))
    }

    /// The target this executor hits
    pub fn target(&self) -> &str {
        &self.target
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    fn name(&self) -> &str {
        "http"
    }

    async fn execute(&self) -> RequestOutcome {
        let request = match self
            .client
            .get(&self.target)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header(ACCEPT, ACCEPT_VALUE)
            .build()
        {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(
                    target_url = %self.target,
                    error = %e,
                    "Failed to build request"
                );
                return RequestOutcome::transport_failure();
            }
        };

        let start = Instant::now();
        let mut response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, timeout = e.is_timeout(), "Request failed");
                return RequestOutcome::transport_failure();
            }
        };

        let status = response.status().as_u16();
        loop {
            match response.chunk().await {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!(status, error = %e, "Failed to drain response body");
                    return RequestOutcome::transport_failure();
                }
            }
        }

        let outcome = RequestOutcome::from_status(status, start.elapsed());
        if outcome.is_overload_signal() {
            tracing::warn!(status, "{}", overload_advice(outcome.status.code()));
        }

        outcome
    }
}
