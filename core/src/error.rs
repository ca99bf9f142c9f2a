//! Error types for loadpace-core

use thiserror::Error;

use crate::config::ConfigError;

/// Core error type
///
/// Per-request failures never surface here; they are absorbed into the
/// run statistics. These variants cover the setup and teardown paths only.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration rejected by validation
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A builder was finished without a required field
    #[error("missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// The shared HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// A worker task failed to complete
    #[error("worker error: {0}")]
    Worker(String),
}

impl Error {
    /// Create a missing-field error for builders
    pub fn missing_config(field: &'static str) -> Self {
        Error::MissingConfig(field)
    }

    /// Create a worker error
    pub fn worker(message: impl Into<String>) -> Self {
        Error::Worker(message.into())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
