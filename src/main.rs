use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{
    ConfigCommand, ExportCommand, HistoryCommand, InsightCommand, ProfileCommand, StatsCommand,
    SubmitCommand,
};
use config::Config;

#[derive(Parser)]
#[command(name = "qt")]
#[command(version)]
#[command(about = "Daily devotional (QT) check-in for youth groups", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit today's devotional record
    Submit(SubmitCommand),

    /// Show recent submissions
    History(HistoryCommand),

    /// Show participation counts by chapel and village
    Stats(StatsCommand),

    /// Write the history to a JSON backup file
    Export(ExportCommand),

    /// Ask the AI for feedback on a reflection
    Insight(InsightCommand),

    /// Show or clear the remembered submitter
    Profile(ProfileCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(cli.config)?;

    match &cli.command {
        Some(Commands::Submit(cmd)) => cmd.run(&config).await,
        Some(Commands::History(cmd)) => cmd.run(&config).await,
        Some(Commands::Stats(cmd)) => cmd.run(&config).await,
        Some(Commands::Export(cmd)) => cmd.run(&config).await,
        Some(Commands::Insight(cmd)) => cmd.run(&config).await,
        Some(Commands::Profile(cmd)) => cmd.run(&config),
        Some(Commands::Config(cmd)) => cmd.run(&config),
        None => {
            println!("Use --help to see available commands");
            Ok(())
        }
    }
}
