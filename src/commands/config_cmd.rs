use clap::{Args, Subcommand};
use std::fs;
use std::io::Write;

use qtians_core::{Endpoints, SettingsError};

use super::OutputFormat;
use crate::config::{Config, ConfigValue};

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

const DEFAULT_CONFIG: &str = r#"# qtians configuration

# Where the history cache and submitter profile are kept
# (default: platform data dir, e.g. ~/.local/share/qtians)
# data_dir: /path/to/qtians-data

# Timeout for each spreadsheet or AI request, in seconds
# request_timeout_secs: 30

# Spreadsheet web-app endpoints (Apps Script /exec URLs)
endpoints:
  primary: PASTE_YOUR_PRIMARY_SCRIPT_URL
  # backup: PASTE_YOUR_BACKUP_SCRIPT_URL

# Chapels and villages shown in stats, in display order
groups:
  chapels:
    - 본당 고등부
    - 비전홀 고등부
  villages:
    - 1마을
    - 2마을
    - 3마을
    - 4마을
    - 5마을

# AI insight (Gemini)
# insight:
#   api_key: your-api-key
#   model: gemini-3-flash-preview
"#;

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => print_config(config),
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = Config::default_config_path();

                // Check if config already exists
                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'qt config show' to view current configuration.");
                    return Ok(());
                }

                // Create parent directory
                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let mut file = fs::File::create(&config_path)?;
                file.write_all(DEFAULT_CONFIG.as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nSet endpoints.primary to your spreadsheet script URL.");
                Ok(())
            }
        }
    }
}

fn print_value<T: std::fmt::Display>(key: &str, value: &ConfigValue<T>) {
    println!("{}: {}", key, value.value);
    println!("  source: {}", value.source);
    println!();
}

fn endpoint_status(endpoints: &Endpoints) -> (String, String) {
    let primary = match endpoints.primary_url() {
        Ok(url) => url.to_string(),
        Err(SettingsError::MissingEndpoint) => "(not set)".to_string(),
        Err(e) => format!("(invalid: {})", e),
    };
    let backup = match (&endpoints.backup, endpoints.backup_url()) {
        (_, Some(url)) => url.to_string(),
        (None, None) => "(not set)".to_string(),
        (Some(raw), None) => format!("(ignored: {})", raw),
    };
    (primary, backup)
}

fn print_config(config: &Config) {
    println!("Configuration");
    println!("=============\n");

    if let Some(path) = &config.config_file {
        println!("Config file: {}", path.display());
    } else {
        println!(
            "Config file: {} (not found)",
            Config::default_config_path().display()
        );
    }
    println!();

    println!("data_dir: {}", config.data_dir.value.display());
    println!("  source: {}", config.data_dir.source);
    println!();

    print_value("request_timeout_secs", &config.request_timeout_secs);

    let (primary, backup) = endpoint_status(&config.endpoints);
    println!("endpoints.primary: {}", primary);
    println!("endpoints.backup:  {}", backup);
    println!();

    println!("groups.chapels:  {}", config.groups.chapels.join(", "));
    println!("groups.villages: {}", config.groups.villages.join(", "));
    println!();

    println!(
        "insight.api_key: {}",
        if config.insight.is_configured() {
            "set"
        } else {
            "not set"
        }
    );
    println!("insight.model:   {}", config.insight.model);
}
