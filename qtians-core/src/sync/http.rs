//! Shared HTTP client construction.

use std::time::Duration;

/// Per-request timeout when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the client used for every spreadsheet request.
///
/// A bounded timeout keeps a hung backend from holding a submission open.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("qtians/", env!("CARGO_PKG_VERSION")))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client() {
        assert!(build_client(DEFAULT_REQUEST_TIMEOUT).is_ok());
        assert!(build_client(Duration::from_millis(1)).is_ok());
    }
}
