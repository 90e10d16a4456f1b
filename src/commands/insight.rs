use clap::Args;

use qtians_core::InsightClient;

use super::{insight_client, text_or_stdin, OutputFormat};
use crate::config::Config;

#[derive(Args)]
pub struct InsightCommand {
    /// Reflection text ("-" or omitted reads stdin)
    pub text: Option<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl InsightCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let reflection = text_or_stdin(self.text.as_deref())?;
        if reflection.trim().is_empty() {
            return Err("Reflection text is empty".into());
        }

        let client = insight_client(config)?;
        let insight = client.generate(&reflection).await?;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&insight)?),
            OutputFormat::Text => println!("{}", insight),
        }
        Ok(())
    }
}
