//! Explicit configuration values consumed by the workflow and the aggregator.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker left in endpoint templates until a deployed script URL is pasted in.
const PLACEHOLDER_MARKER: &str = "PASTE_YOUR";

/// Configuration problems detected before any network attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("No primary endpoint configured. Set endpoints.primary in the config file or QT_PRIMARY_URL.")]
    MissingEndpoint,

    #[error("Endpoint is still a placeholder: {0}")]
    PlaceholderEndpoint(String),

    #[error("Invalid endpoint URL '{0}': {1}")]
    MalformedEndpoint(String, String),
}

/// Spreadsheet endpoints. The primary is written and read; the backup is
/// only written to, and only when it is well-formed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub backup: Option<String>,
}

impl Endpoints {
    pub fn new(primary: impl Into<String>, backup: Option<String>) -> Self {
        Self {
            primary: Some(primary.into()),
            backup,
        }
    }

    /// The primary endpoint, or the configuration error that aborts a submission.
    pub fn primary_url(&self) -> Result<Url, SettingsError> {
        match self.primary.as_deref() {
            Some(raw) => parse_endpoint(raw),
            None => Err(SettingsError::MissingEndpoint),
        }
    }

    /// The backup endpoint if it is configured and well-formed.
    pub fn backup_url(&self) -> Option<Url> {
        self.backup.as_deref().and_then(|raw| parse_endpoint(raw).ok())
    }
}

/// Parses an endpoint string, rejecting blanks, template placeholders and
/// non-HTTP schemes.
pub fn parse_endpoint(raw: &str) -> Result<Url, SettingsError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(SettingsError::MissingEndpoint);
    }
    if raw.contains(PLACEHOLDER_MARKER) {
        return Err(SettingsError::PlaceholderEndpoint(raw.to_string()));
    }

    let url = Url::parse(raw)
        .map_err(|e| SettingsError::MalformedEndpoint(raw.to_string(), e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(SettingsError::MalformedEndpoint(
            raw.to_string(),
            format!("unsupported scheme '{}'", scheme),
        )),
    }
}

/// The fixed chapel and village enumerations.
///
/// Shared by the input surface (to flag unknown groups) and the aggregator
/// (to build the table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCatalog {
    pub chapels: Vec<String>,
    pub villages: Vec<String>,
}

impl Default for GroupCatalog {
    fn default() -> Self {
        Self {
            chapels: vec!["본당 고등부".to_string(), "비전홀 고등부".to_string()],
            villages: (1..=5).map(|n| format!("{}마을", n)).collect(),
        }
    }
}

impl GroupCatalog {
    pub fn new(chapels: Vec<String>, villages: Vec<String>) -> Self {
        Self { chapels, villages }
    }

    pub fn has_chapel(&self, chapel: &str) -> bool {
        self.chapels.iter().any(|c| c == chapel)
    }

    pub fn has_village(&self, village: &str) -> bool {
        self.villages.iter().any(|v| v == village)
    }

    pub fn contains(&self, chapel: &str, village: &str) -> bool {
        self.has_chapel(chapel) && self.has_village(village)
    }
}
