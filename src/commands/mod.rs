mod config_cmd;
mod export;
mod history;
mod insight;
mod profile;
mod stats;
mod submit;

pub use config_cmd::ConfigCommand;
pub use export::ExportCommand;
pub use history::HistoryCommand;
pub use insight::InsightCommand;
pub use profile::ProfileCommand;
pub use stats::StatsCommand;
pub use submit::SubmitCommand;

use chrono::Local;
use clap::ValueEnum;
use std::io::Read;

use qtians_core::sync::build_client;
use qtians_core::{GeminiInsightClient, InsightError, LocalStore, SubmissionWorkflow};

use crate::config::Config;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Opens the workflow over the configured data directory and endpoints.
pub(crate) fn open_workflow(
    config: &Config,
) -> Result<SubmissionWorkflow, Box<dyn std::error::Error>> {
    let local = LocalStore::new(config.data_dir.value.clone());
    let workflow =
        SubmissionWorkflow::new(config.endpoints.clone(), local, config.request_timeout())?;
    Ok(workflow)
}

pub(crate) fn insight_client(
    config: &Config,
) -> Result<GeminiInsightClient, Box<dyn std::error::Error>> {
    let api_key = match &config.insight.api_key {
        Some(key) if config.insight.is_configured() => key.clone(),
        _ => return Err(InsightError::NotConfigured.into()),
    };
    let client = build_client(config.request_timeout())?;
    Ok(GeminiInsightClient::new(
        client,
        api_key,
        config.insight.model.clone(),
    ))
}

/// Today's local date as YYYY-MM-DD.
pub(crate) fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Returns `text`, or stdin when `text` is absent or `-`.
pub(crate) fn text_or_stdin(text: Option<&str>) -> Result<String, std::io::Error> {
    match text {
        Some(t) if t != "-" => Ok(t.to_string()),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf.trim_end().to_string())
        }
    }
}

/// First line of `text`, cut to `max` characters.
pub(crate) fn preview(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or("").trim();
    if line.chars().count() > max {
        let cut: String = line.chars().take(max).collect();
        format!("{}…", cut)
    } else if text.trim().lines().count() > 1 {
        format!("{}…", line)
    } else {
        line.to_string()
    }
}
