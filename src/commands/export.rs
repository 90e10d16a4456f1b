use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

use qtians_core::DevotionalRecord;

use super::{open_workflow, today};
use crate::config::Config;

#[derive(Args)]
pub struct ExportCommand {
    /// Directory to write the backup file into (defaults to the current directory)
    #[arg(long, short)]
    pub dir: Option<PathBuf>,

    /// Export the local cache without contacting the spreadsheet
    #[arg(long)]
    pub offline: bool,
}

impl ExportCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let mut workflow = open_workflow(config)?;
        if !self.offline {
            workflow.refresh().await;
        }

        let dir = self.dir.clone().unwrap_or_else(|| PathBuf::from("."));
        let path = write_backup(&dir, &today(), workflow.history())?;

        println!(
            "Exported {} record(s) to {}",
            workflow.history().len(),
            path.display()
        );
        Ok(())
    }
}

pub(crate) fn backup_filename(date: &str) -> String {
    format!("qtians-backup-{}.json", date)
}

/// Writes `records` as pretty JSON to `dir/qtians-backup-<date>.json`.
pub(crate) fn write_backup(
    dir: &Path,
    date: &str,
    records: &[DevotionalRecord],
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)?;
    let path = dir.join(backup_filename(date));
    let json = serde_json::to_string_pretty(records)?;
    fs::write(&path, json)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_backup_filename() {
        assert_eq!(
            backup_filename("2024-03-05"),
            "qtians-backup-2024-03-05.json"
        );
    }

    #[test]
    fn test_write_backup_round_trips_history() {
        let temp_dir = tempdir().unwrap();
        let records = vec![
            DevotionalRecord::new("2024-03-05", "김철수", "본당 고등부", "1마을", "시편 23편"),
            DevotionalRecord::new("2024-03-04", "이영희", "비전홀 고등부", "2마을", "요한복음 3:16"),
        ];

        let path = write_backup(temp_dir.path(), "2024-03-05", &records).unwrap();

        assert_eq!(path, temp_dir.path().join("qtians-backup-2024-03-05.json"));
        let contents = fs::read_to_string(&path).unwrap();
        let loaded: Vec<DevotionalRecord> = serde_json::from_str(&contents).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_write_backup_empty_history() {
        let temp_dir = tempdir().unwrap();
        let path = write_backup(&temp_dir.path().join("nested"), "2024-03-05", &[]).unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "[]");
    }
}
