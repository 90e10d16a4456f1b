use clap::{Args, Subcommand};

use qtians_core::LocalStore;

use super::OutputFormat;
use crate::config::Config;

#[derive(Args)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub command: Option<ProfileSubcommand>,
}

#[derive(Subcommand)]
pub enum ProfileSubcommand {
    /// Show the remembered submitter
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Forget the remembered submitter
    Clear,
}

impl ProfileCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let store = LocalStore::new(config.data_dir.value.clone());

        match &self.command {
            None => show(&store, &OutputFormat::Text),
            Some(ProfileSubcommand::Show { format }) => show(&store, format),
            Some(ProfileSubcommand::Clear) => {
                store.clear_profile()?;
                println!("Submitter profile cleared.");
                Ok(())
            }
        }
    }
}

fn show(store: &LocalStore, format: &OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let profile = store.load_profile()?.filter(|p| !p.is_empty());

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&profile)?),
        OutputFormat::Text => match profile {
            Some(p) => {
                println!("Name:    {}", p.name);
                println!("Chapel:  {}", p.chapel);
                println!("Village: {}", p.village);
            }
            None => println!("No submitter remembered yet."),
        },
    }
    Ok(())
}
