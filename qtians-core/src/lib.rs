//! QTIANS Core Library
//!
//! Devotional records, spreadsheet sync, local cache and per-group stats
//! shared by QTIANS front ends.

pub mod date;
pub mod insight;
pub mod models;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod sync;
pub mod workflow;

#[cfg(test)]
mod test_support;

/// Maximum number of records kept in the local history.
pub const HISTORY_LIMIT: usize = 50;

pub use date::normalize_date;
pub use insight::{GeminiInsightClient, InsightClient, InsightError};
pub use models::{AiInsight, DevotionalRecord, SubmissionDraft, SubmitterProfile};
pub use settings::{Endpoints, GroupCatalog, SettingsError};
pub use stats::{aggregate, StatsTable};
pub use storage::{LocalStore, Slot, StorageError};
pub use sync::{DispatchOutcome, HistoryStore, RefreshSource, RemoteSubmitter};
pub use workflow::{Phase, SubmissionReport, SubmissionWorkflow, WorkflowError, SUCCESS_NOTICE};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
