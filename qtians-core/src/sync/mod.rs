//! Spreadsheet synchronization.
//!
//! Writes are fire-and-forget form posts to the primary endpoint and an
//! optional backup. Reads are a JSON fetch from the primary endpoint that
//! replaces the local history cache whenever it succeeds.

mod error;
mod history;
mod http;
mod submitter;

pub use error::FetchError;
pub use history::{HistoryStore, RefreshSource};
pub use http::{build_client, DEFAULT_REQUEST_TIMEOUT};
pub use submitter::{DispatchOutcome, RemoteSubmitter};
