//! Sync error types.

use thiserror::Error;

/// Errors from reading the remote history.
///
/// None of these reach the user directly: the history store logs them and
/// falls back to the local cache.
#[derive(Error, Debug)]
pub enum FetchError {
    /// No usable primary endpoint
    #[error("Primary endpoint not configured")]
    NotConfigured,

    /// Connection, timeout or other transport failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Server answered with a non-success status
    #[error("Server returned status {0}")]
    Status(u16),

    /// Body was not a JSON array of records
    #[error("Malformed history payload: {0}")]
    Payload(String),
}
