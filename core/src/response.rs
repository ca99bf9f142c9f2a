//! Request outcome types and classification

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Status-map key used for requests that never produced an HTTP status
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

/// Status key for the run's status-code mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKey {
    /// The request could not be built or the transport failed
    Transport,
    /// An HTTP status code was received
    Http(u16),
}

impl StatusKey {
    /// Numeric code used in the status map (`0` for transport failures)
    pub fn code(&self) -> u16 {
        match self {
            StatusKey::Transport => TRANSPORT_FAILURE_STATUS,
            StatusKey::Http(code) => *code,
        }
    }
}

impl fmt::Display for StatusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Success/failure classification of one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeClass {
    /// 2xx or 3xx response
    Success,
    /// Transport failure or an unfavorable status
    Failure,
}

/// Classified result of one request attempt
///
/// Transient: built by the executor, folded into the run statistics and
/// then dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOutcome {
    /// Dispatch-to-body-drained latency; `None` when the server never answered
    pub latency: Option<Duration>,

    /// Observed status or the transport sentinel
    pub status: StatusKey,

    /// Success or failure
    pub class: OutcomeClass,
}

impl RequestOutcome {
    /// Outcome for a request that could not be built or never reached the server
    pub fn transport_failure() -> Self {
        Self {
            latency: None,
            status: StatusKey::Transport,
            class: OutcomeClass::Failure,
        }
    }

    /// Outcome for a received response, classified by status code
    pub fn from_status(status: u16, latency: Duration) -> Self {
        let class = if (200..400).contains(&status) {
            OutcomeClass::Success
        } else {
            OutcomeClass::Failure
        };

        Self {
            latency: Some(latency),
            status: StatusKey::Http(status),
            class,
        }
    }

    /// Check if this outcome counts as a success
    pub fn is_success(&self) -> bool {
        self.class == OutcomeClass::Success
    }

    /// Latency in whole milliseconds, if one was measured
    pub fn latency_ms(&self) -> Option<u64> {
        self.latency
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    /// Whether the status suggests the server is rate limiting or overloaded
    pub fn is_overload_signal(&self) -> bool {
        matches!(self.status, StatusKey::Http(429) | StatusKey::Http(503))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_failure_has_no_latency() {
        let outcome = RequestOutcome::transport_failure();
        assert_eq!(outcome.status.code(), 0);
        assert!(outcome.latency.is_none());
        assert!(outcome.latency_ms().is_none());
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_status_classification() {
        let ms = Duration::from_millis(12);
        for status in [200, 204, 301, 304, 399] {
            assert!(RequestOutcome::from_status(status, ms).is_success(), "{status}");
        }
        for status in [100, 199, 400, 404, 429, 500, 503] {
            let outcome = RequestOutcome::from_status(status, ms);
            assert!(!outcome.is_success(), "{status}");
            assert_eq!(outcome.latency_ms(), Some(12));
        }
    }

    #[test]
    fn test_overload_signal() {
        let ms = Duration::from_millis(1);
        assert!(RequestOutcome::from_status(429, ms).is_overload_signal());
        assert!(RequestOutcome::from_status(503, ms).is_overload_signal());
        assert!(!RequestOutcome::from_status(500, ms).is_overload_signal());
        assert!(!RequestOutcome::transport_failure().is_overload_signal());
    }

    #[test]
    fn test_status_key_display() {
        assert_eq!(StatusKey::Transport.to_string(), "0");
        assert_eq!(StatusKey::Http(404).to_string(), "404");
    }
}
