mod commands;
mod config;
mod display;
mod domain;
mod github;
mod notify;
mod store;
mod usecase;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::config_cmd::ConfigCommands;

#[derive(Parser)]
#[command(
    name = "prr",
    about = "Desktop reminders for GitHub pull requests waiting on your review",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch configured repositories and notify on pending reviews (default)
    Watch,
    /// List pull requests awaiting review, once
    List,
    /// Show configuration and verify the token
    Status,
    /// Manage configuration (interactive setup when no subcommand given)
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("prr=info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Watch) {
        Commands::Watch => commands::watch::run().await,
        Commands::List => commands::list::run().await,
        Commands::Status => commands::status::run().await,
        Commands::Config { command } => commands::config_cmd::run(command).await,
    }
}
