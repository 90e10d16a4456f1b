//! Submission workflow.
//!
//! ```text
//! Idle -> Submitting -> Success -> (5s) -> Idle
//!                   \-> Failed  -> Idle
//! ```
//!
//! `submit` takes `&mut self`, so a second submission cannot start while one
//! is in flight.

use std::fmt;
use std::time::Duration;

use futures::future::join;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::models::{DevotionalRecord, SubmissionDraft, SubmitterProfile};
use crate::settings::{Endpoints, GroupCatalog, SettingsError};
use crate::stats::{aggregate, StatsTable};
use crate::storage::LocalStore;
use crate::sync::{build_client, DispatchOutcome, HistoryStore, RefreshSource, RemoteSubmitter};

/// How long `Success` is shown before the workflow reads as `Idle` again.
pub const SUCCESS_NOTICE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Success,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Submitting => write!(f, "submitting"),
            Phase::Success => write!(f, "success"),
            Phase::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Config(#[from] SettingsError),

    #[error("Failed to create HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// What one submission did.
#[derive(Debug, Clone)]
pub struct SubmissionReport {
    pub record: DevotionalRecord,
    pub primary: DispatchOutcome,
    pub backup: DispatchOutcome,
    pub refresh: RefreshSource,
}

impl SubmissionReport {
    /// True when no endpoint accepted the request.
    pub fn nothing_sent(&self) -> bool {
        !self.primary.is_dispatched() && !self.backup.is_dispatched()
    }
}

/// Owns the history and the last-submitter profile and drives submissions.
pub struct SubmissionWorkflow {
    endpoints: Endpoints,
    submitter: RemoteSubmitter,
    history: HistoryStore,
    local: LocalStore,
    profile: SubmitterProfile,
    phase: Phase,
    success_until: Option<Instant>,
    listener: Option<mpsc::UnboundedSender<Phase>>,
}

impl SubmissionWorkflow {
    /// Creates a workflow with its own HTTP client and loads the local cache.
    pub fn new(
        endpoints: Endpoints,
        local: LocalStore,
        timeout: Duration,
    ) -> Result<Self, WorkflowError> {
        let client = build_client(timeout)?;
        Ok(Self::with_client(endpoints, local, client))
    }

    /// Creates a workflow around an existing HTTP client and loads the local cache.
    pub fn with_client(endpoints: Endpoints, local: LocalStore, client: reqwest::Client) -> Self {
        let mut history =
            HistoryStore::new(client.clone(), endpoints.primary_url().ok(), local.clone());
        history.load_cached();

        let profile = match local.load_profile() {
            Ok(profile) => profile.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable submitter profile");
                SubmitterProfile::default()
            }
        };

        Self {
            endpoints,
            submitter: RemoteSubmitter::new(client),
            history,
            local,
            profile,
            phase: Phase::Idle,
            success_until: None,
            listener: None,
        }
    }

    /// Returns a channel that receives every phase change.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<Phase> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listener = Some(tx);
        rx
    }

    /// Current phase. `Success` reads as `Idle` once the notice window has passed.
    pub fn phase(&self) -> Phase {
        match (self.phase, self.success_until) {
            (Phase::Success, Some(until)) if Instant::now() >= until => Phase::Idle,
            (phase, _) => phase,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.phase == Phase::Submitting
    }

    pub fn history(&self) -> &[DevotionalRecord] {
        self.history.records()
    }

    pub fn last_refresh(&self) -> Option<RefreshSource> {
        self.history.last_source()
    }

    pub fn profile(&self) -> &SubmitterProfile {
        &self.profile
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// A blank draft for `date`, pre-filled from the last submitter.
    pub fn draft(&self, date: impl Into<String>) -> SubmissionDraft {
        SubmissionDraft::new(date).with_profile(&self.profile)
    }

    /// Refreshes history from the spreadsheet, falling back to the cache.
    pub async fn refresh(&mut self) -> &[DevotionalRecord] {
        self.history.refresh().await
    }

    /// Count table for `date` over the current history.
    pub fn stats(&self, date: &str, catalog: &GroupCatalog) -> StatsTable {
        aggregate(self.history.records(), date, catalog)
    }

    /// Submits a completed draft.
    ///
    /// Field completeness is the caller's job. Dispatches to the primary and
    /// backup endpoints concurrently and waits for both, whatever their
    /// outcome, then refreshes history and stores the profile. On success
    /// only the draft's reflection is cleared.
    pub async fn submit(
        &mut self,
        draft: &mut SubmissionDraft,
    ) -> Result<SubmissionReport, WorkflowError> {
        self.transition(Phase::Submitting);

        let primary_url = match self.endpoints.primary_url() {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "submission aborted");
                self.transition(Phase::Failed);
                self.transition(Phase::Idle);
                return Err(e.into());
            }
        };
        let backup_url = self.endpoints.backup_url();
        if backup_url.is_none() && self.endpoints.backup.is_some() {
            warn!("backup endpoint is malformed, skipping it");
        }

        let record = DevotionalRecord::from_draft(draft);

        let (primary, backup) = join(
            self.submitter.submit(&primary_url, &record),
            self.submitter.submit_to(backup_url.as_ref(), &record),
        )
        .await;

        info!(
            id = %record.id,
            primary = %primary,
            backup = %backup,
            "submission attempted"
        );

        self.history.record_local(record.clone());
        self.history.refresh().await;
        let refresh = self
            .history
            .last_source()
            .unwrap_or(RefreshSource::Unchanged);

        self.profile = SubmitterProfile::from_record(&record);
        if let Err(e) = self.local.save_profile(&self.profile) {
            warn!(error = %e, "failed to store submitter profile");
        }

        draft.clear_reflection();
        self.success_until = Some(Instant::now() + SUCCESS_NOTICE);
        self.transition(Phase::Success);

        Ok(SubmissionReport {
            record,
            primary,
            backup,
            refresh,
        })
    }

    /// Sleeps out the success notice and publishes the return to `Idle`.
    pub async fn wait_until_idle(&mut self) {
        if self.phase != Phase::Success {
            return;
        }
        if let Some(until) = self.success_until {
            tokio::time::sleep_until(until).await;
        }
        self.success_until = None;
        self.transition(Phase::Idle);
    }

    fn transition(&mut self, phase: Phase) {
        self.phase = phase;
        if phase != Phase::Success {
            self.success_until = None;
        }
        if let Some(listener) = &self.listener {
            let _ = listener.send(phase);
        }
    }
}
