use clap::Args;
use std::collections::BTreeMap;

use qtians_core::{DevotionalRecord, RefreshSource, HISTORY_LIMIT};

use super::{open_workflow, preview, OutputFormat};
use crate::config::Config;

#[derive(Args)]
pub struct HistoryCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Use the local cache without contacting the spreadsheet
    #[arg(long)]
    pub offline: bool,

    /// Show at most this many records
    #[arg(long, short = 'n', default_value_t = HISTORY_LIMIT)]
    pub limit: usize,
}

impl HistoryCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let mut workflow = open_workflow(config)?;
        if !self.offline {
            workflow.refresh().await;
            if workflow.last_refresh() == Some(RefreshSource::Cache) {
                eprintln!("Warning: spreadsheet unreachable; showing the local cache");
            }
        }

        let records: Vec<&DevotionalRecord> = workflow.history().iter().take(self.limit).collect();

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&records)?);
            }
            OutputFormat::Text => print_history(&records),
        }

        Ok(())
    }
}

fn print_history(records: &[&DevotionalRecord]) {
    if records.is_empty() {
        println!("No submissions yet.");
        return;
    }

    // Newest date first; records keep their history order within a date.
    let mut by_date: BTreeMap<&str, Vec<&DevotionalRecord>> = BTreeMap::new();
    for record in records {
        by_date.entry(record.date.as_str()).or_default().push(record);
    }

    for (date, day) in by_date.iter().rev() {
        println!("{} ({})", date, day.len());
        for record in day {
            println!(
                "  {} · {} / {}  {}",
                record.name,
                record.chapel,
                record.village,
                preview(&record.scripture, 40)
            );
        }
        println!();
    }

    println!("{} record(s)", records.len());
}
