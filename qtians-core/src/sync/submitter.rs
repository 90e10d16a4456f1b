//! Fire-and-forget record posting.

use reqwest::Url;
use std::fmt;
use tracing::{debug, warn};

use crate::models::DevotionalRecord;

/// What happened to one write.
///
/// The spreadsheet script gives no machine-readable acknowledgment, so
/// `Dispatched` means the request left the client, not that a row was stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Dispatched,
    TransportError(String),
    NotAttempted,
}

impl DispatchOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, DispatchOutcome::Dispatched)
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchOutcome::Dispatched => write!(f, "sent"),
            DispatchOutcome::TransportError(e) => write!(f, "failed ({})", e),
            DispatchOutcome::NotAttempted => write!(f, "not configured"),
        }
    }
}

/// Posts records as form-encoded bodies.
#[derive(Debug, Clone)]
pub struct RemoteSubmitter {
    client: reqwest::Client,
}

impl RemoteSubmitter {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Posts `record` to `endpoint`. Never fails; the outcome says how far it got.
    pub async fn submit(&self, endpoint: &Url, record: &DevotionalRecord) -> DispatchOutcome {
        debug!(endpoint = %endpoint, id = %record.id, "dispatching record");

        match self
            .client
            .post(endpoint.clone())
            .form(&record.form_fields())
            .send()
            .await
        {
            Ok(response) => {
                debug!(endpoint = %endpoint, status = %response.status(), "record dispatched");
                DispatchOutcome::Dispatched
            }
            Err(e) => {
                warn!(endpoint = %endpoint, error = %e, "record dispatch failed");
                DispatchOutcome::TransportError(e.to_string())
            }
        }
    }

    /// Like [`submit`](Self::submit), but skips absent endpoints.
    pub async fn submit_to(
        &self,
        endpoint: Option<&Url>,
        record: &DevotionalRecord,
    ) -> DispatchOutcome {
        match endpoint {
            Some(url) => self.submit(url, record).await,
            None => DispatchOutcome::NotAttempted,
        }
    }
}
