//! Remote history with a local cache fallback.

use chrono::Utc;
use reqwest::Url;
use tracing::{debug, info, warn};

use super::error::FetchError;
use crate::models::DevotionalRecord;
use crate::storage::LocalStore;
use crate::HISTORY_LIMIT;

/// Where the current history came from after a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshSource {
    /// Fresh remote fetch; the cache was overwritten.
    Remote,
    /// Remote fetch failed; history was reloaded from the cache.
    Cache,
    /// Remote fetch failed and no usable cache existed; history kept as is.
    Unchanged,
}

/// Known devotional records, newest first, at most `HISTORY_LIMIT`.
///
/// A successful fetch replaces the history and the cache wholesale. Records
/// that were only recorded locally are not merged back in, so a fresh
/// submission can vanish until the spreadsheet starts returning it.
#[derive(Debug)]
pub struct HistoryStore {
    client: reqwest::Client,
    endpoint: Option<Url>,
    local: LocalStore,
    records: Vec<DevotionalRecord>,
    last_source: Option<RefreshSource>,
}

impl HistoryStore {
    pub fn new(client: reqwest::Client, endpoint: Option<Url>, local: LocalStore) -> Self {
        Self {
            client,
            endpoint,
            local,
            records: Vec::new(),
            last_source: None,
        }
    }

    pub fn records(&self) -> &[DevotionalRecord] {
        &self.records
    }

    pub fn last_source(&self) -> Option<RefreshSource> {
        self.last_source
    }

    /// Replaces the in-memory history with the cached one, if any.
    ///
    /// Returns false when the cache is missing or unreadable.
    pub fn load_cached(&mut self) -> bool {
        match self.local.load_history() {
            Ok(Some(mut records)) => {
                records.truncate(HISTORY_LIMIT);
                debug!(count = records.len(), "loaded cached history");
                self.records = records;
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable history cache");
                false
            }
        }
    }

    /// Puts a just-submitted record at the front and persists the cache.
    pub fn record_local(&mut self, record: DevotionalRecord) {
        self.records.insert(0, record.normalized());
        self.records.truncate(HISTORY_LIMIT);
        self.persist();
    }

    /// Fetches the remote history, falling back to the cache on any failure.
    pub async fn refresh(&mut self) -> &[DevotionalRecord] {
        let source = match self.fetch_remote().await {
            Ok(records) => {
                info!(count = records.len(), "history refreshed from spreadsheet");
                self.records = records;
                self.persist();
                RefreshSource::Remote
            }
            Err(e) => {
                warn!(error = %e, "history fetch failed, using local cache");
                if self.load_cached() {
                    RefreshSource::Cache
                } else {
                    RefreshSource::Unchanged
                }
            }
        };

        self.last_source = Some(source);
        &self.records
    }

    /// Reads the remote rows, normalized and ordered newest first.
    ///
    /// The script returns rows in append order, oldest first.
    pub async fn fetch_remote(&self) -> Result<Vec<DevotionalRecord>, FetchError> {
        let endpoint = self.endpoint.as_ref().ok_or(FetchError::NotConfigured)?;
        let cache_buster = Utc::now().timestamp_millis().to_string();

        let response = self
            .client
            .get(endpoint.clone())
            .query(&[("t", cache_buster.as_str())])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let rows: Vec<DevotionalRecord> =
            serde_json::from_str(&body).map_err(|e| FetchError::Payload(e.to_string()))?;

        Ok(rows
            .into_iter()
            .rev()
            .take(HISTORY_LIMIT)
            .map(DevotionalRecord::normalized)
            .collect())
    }

    fn persist(&self) {
        if let Err(e) = self.local.save_history(&self.records) {
            warn!(error = %e, "failed to write history cache");
        }
    }
}
