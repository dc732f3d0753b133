//! Error types for the trace relay pipeline

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, RelayError>;

/// Main error type for the relay.
///
/// `Configuration` and `TraceFetch` abort an invocation; `MetadataFetch` and
/// `Delivery` are recoverable and absorbed by the pipeline.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Trigger input error
    #[error("Invalid trigger: {0}")]
    InvalidTrigger(String),

    /// Trace fetch error
    #[error("Trace fetch error: {0}")]
    TraceFetch(String),

    /// Contract metadata fetch error
    #[error("Contract metadata error: {0}")]
    MetadataFetch(String),

    /// Webhook delivery error
    #[error("Webhook delivery error: {0}")]
    Delivery(String),
}
