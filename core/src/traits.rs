//! Core traits
//!
//! Workers only see the executor through [`RequestExecutor`], which keeps the
//! HTTP implementation swappable for scripted executors in tests.

use async_trait::async_trait;

use crate::response::RequestOutcome;

/// Issues one request against the target and classifies the result
///
/// Implementations never fail: every error is folded into the returned
/// [`RequestOutcome`] as a failure.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Executor identifier for logs (e.g., "http")
    fn name(&self) -> &str;

    /// Execute one request and return its classified outcome
    async fn execute(&self) -> RequestOutcome;
}
