use clap::Args;

use qtians_core::{InsightClient, Phase, RefreshSource, SubmissionDraft, SUCCESS_NOTICE};

use super::{insight_client, open_workflow, text_or_stdin, today};
use crate::config::Config;

#[derive(Args)]
pub struct SubmitCommand {
    /// Devotional date (YYYY-MM-DD), defaults to today
    #[arg(long, short)]
    pub date: Option<String>,

    /// Submitter name, defaults to the last submitter
    #[arg(long, short)]
    pub name: Option<String>,

    /// Chapel, defaults to the last submitter's
    #[arg(long)]
    pub chapel: Option<String>,

    /// Village, defaults to the last submitter's
    #[arg(long)]
    pub village: Option<String>,

    /// Scripture and reflection text ("-" or omitted reads stdin)
    #[arg(long, short)]
    pub scripture: Option<String>,

    /// Also request AI feedback on the reflection
    #[arg(long)]
    pub insight: bool,

    /// Stay until the success notice clears
    #[arg(long)]
    pub wait: bool,
}

impl SubmitCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let mut workflow = open_workflow(config)?;
        let mut phases = workflow.subscribe();

        let date = self.date.clone().unwrap_or_else(today);
        let mut draft = workflow.draft(date);
        self.apply_overrides(&mut draft)?;

        let missing = draft.missing_fields();
        if !missing.is_empty() {
            return Err(format!("Missing required field(s): {}", missing.join(", ")).into());
        }

        if !config.groups.has_chapel(&draft.chapel) {
            eprintln!("Warning: chapel '{}' is not in the configured list", draft.chapel);
        }
        if !config.groups.has_village(&draft.village) {
            eprintln!("Warning: village '{}' is not in the configured list", draft.village);
        }

        println!("Submitting...");
        let report = workflow.submit(&mut draft).await?;
        while let Ok(phase) = phases.try_recv() {
            tracing::debug!(%phase, "phase changed");
        }

        println!("  primary: {}", report.primary);
        println!("  backup:  {}", report.backup);
        println!();

        if report.nothing_sent() {
            eprintln!("Warning: the record could not be sent; it is kept in local history only");
        }

        println!("Submitted devotional record:");
        println!("  Date:    {}", report.record.date);
        println!("  Name:    {}", report.record.name);
        println!("  Group:   {} / {}", report.record.chapel, report.record.village);
        println!("  ID:      {}", report.record.id);

        if report.refresh == RefreshSource::Cache {
            println!();
            println!("History could not be refreshed; showing the local cache.");
        }

        if self.insight {
            println!();
            match self.request_insight(config, &report.record.scripture).await {
                Ok(card) => println!("{}", card),
                Err(e) => eprintln!("AI insight unavailable: {}", e),
            }
        }

        if self.wait {
            println!();
            println!("Status: {}", Phase::Success);
            workflow.wait_until_idle().await;
            while let Ok(phase) = phases.try_recv() {
                println!("Status: {}", phase);
            }
        } else {
            tracing::debug!(
                notice_secs = SUCCESS_NOTICE.as_secs(),
                "exiting during success notice"
            );
        }

        Ok(())
    }

    fn apply_overrides(&self, draft: &mut SubmissionDraft) -> Result<(), std::io::Error> {
        if let Some(name) = &self.name {
            draft.name = name.clone();
        }
        if let Some(chapel) = &self.chapel {
            draft.chapel = chapel.clone();
        }
        if let Some(village) = &self.village {
            draft.village = village.clone();
        }
        draft.scripture = text_or_stdin(self.scripture.as_deref())?;
        Ok(())
    }

    async fn request_insight(
        &self,
        config: &Config,
        reflection: &str,
    ) -> Result<qtians_core::AiInsight, Box<dyn std::error::Error>> {
        let client = insight_client(config)?;
        Ok(client.generate(reflection).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> SubmitCommand {
        SubmitCommand {
            date: None,
            name: None,
            chapel: None,
            village: None,
            scripture: Some("시편 23편".to_string()),
            insight: false,
            wait: false,
        }
    }

    #[test]
    fn test_overrides_keep_profile_defaults() {
        let mut draft = SubmissionDraft {
            date: "2024-03-05".to_string(),
            name: "김철수".to_string(),
            chapel: "본당 고등부".to_string(),
            village: "1마을".to_string(),
            scripture: String::new(),
        };
        let cmd = SubmitCommand {
            village: Some("3마을".to_string()),
            ..command()
        };

        cmd.apply_overrides(&mut draft).unwrap();

        assert_eq!(draft.name, "김철수");
        assert_eq!(draft.village, "3마을");
        assert_eq!(draft.scripture, "시편 23편");
        assert!(draft.is_complete());
    }

    #[test]
    fn test_overrides_leave_missing_identity_missing() {
        let mut draft = SubmissionDraft::new("2024-03-05");
        command().apply_overrides(&mut draft).unwrap();

        assert_eq!(draft.missing_fields(), vec!["name", "chapel", "village"]);
    }
}
