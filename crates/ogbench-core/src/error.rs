// Error types for the benchmark harness

use thiserror::Error;

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Errors that can abort a benchmark run.
///
/// Per-request and per-measurement failures are NOT represented here; they
/// are recorded inside the report types so a run always completes. These
/// variants cover shell-level problems: bad configuration, unreadable
/// scenario files, unwritable output.
#[derive(Debug, Error)]
pub enum BenchError {
    /// Invalid harness configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Scenario file could not be read or parsed
    #[error("Scenario error: {0}")]
    Scenario(String),

    /// Container telemetry source failure
    #[error("Telemetry error: {0}")]
    Telemetry(String),

    /// Malformed URL
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// HTTP client construction or transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding/decoding failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl BenchError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        BenchError::Configuration(msg.into())
    }

    /// Create a scenario error
    pub fn scenario(msg: impl Into<String>) -> Self {
        BenchError::Scenario(msg.into())
    }

    /// Create a telemetry error
    pub fn telemetry(msg: impl Into<String>) -> Self {
        BenchError::Telemetry(msg.into())
    }
}
