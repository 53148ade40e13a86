//! Library error types

use thiserror::Error;

/// Errors from a remote attendance fetch
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level failure (unreachable, timed out mid-request)
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status from the relay
    #[error("upstream returned status {0}")]
    Status(reqwest::StatusCode),

    /// Success status but the body carried an error field.
    /// Invalid credentials arrive this way; the message text is the only
    /// thing distinguishing them from an outage, so callers treat both alike.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Body did not match the expected snapshot shape
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors from the persistent stores
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying file I/O failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored record could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A tracked account with this roll already exists
    #[error("account already tracked: {0}")]
    DuplicateAccount(String),
}
