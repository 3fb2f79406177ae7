use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use clap::{Subcommand, ValueEnum};

use crate::config::{Settings, is_valid_repo_slug};
use crate::display;
use crate::github;
use crate::store::NotificationStateStore;
use crate::store::sqlite::SqliteStateStore;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Set the GitHub token (prompted, not echoed)
    SetToken,
    /// Add a repository to watch
    AddRepo {
        /// Repository in owner/name form
        repo: String,
    },
    /// Stop watching a repository
    RmRepo {
        /// Repository in owner/name form
        repo: String,
    },
    /// List watched repositories
    Repos,
    /// Show or set the check interval in minutes
    Interval { minutes: Option<u64> },
    /// Turn reminder re-notifications on or off
    Reminder { state: Toggle },
    /// Show or set the reminder interval in minutes
    ReminderInterval { minutes: Option<u64> },
    /// Clear all configuration and notification state
    Clear,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Toggle {
    On,
    Off,
}

pub async fn run(command: Option<ConfigCommands>) -> Result<()> {
    match command {
        None => interactive_setup().await,
        Some(ConfigCommands::SetToken) => set_token().await,
        Some(ConfigCommands::AddRepo { repo }) => add_repo(&repo),
        Some(ConfigCommands::RmRepo { repo }) => rm_repo(&repo),
        Some(ConfigCommands::Repos) => list_repos(),
        Some(ConfigCommands::Interval { minutes }) => interval(minutes),
        Some(ConfigCommands::Reminder { state }) => reminder(state),
        Some(ConfigCommands::ReminderInterval { minutes }) => reminder_interval(minutes),
        Some(ConfigCommands::Clear) => clear(),
    }
}

/// Guided first-time setup: token, repositories, interval.
async fn interactive_setup() -> Result<()> {
    let mut settings = Settings::load_default()?;

    display::info("prr configuration\n");
    display::info("Step 1: GitHub token");
    display::dim("Create a token at: https://github.com/settings/tokens");
    display::dim("Required scopes: repo, read:user\n");

    let token = prompt_token()?;
    let user = github::validate_token(&token)
        .await
        .context("token validation failed")?;
    display::success(&format!("Valid! Authenticated as @{}\n", user.login));
    settings.github_token = token;

    display::info("Step 2: Add repositories");
    display::dim("Format: owner/repo (e.g. rust-lang/rust)\n");
    let mut added = 0;
    loop {
        let repo = prompt("Add repository (or press Enter to finish): ")?;
        if repo.is_empty() {
            break;
        }
        if !is_valid_repo_slug(&repo) {
            display::error("Invalid format. Use: owner/repo");
            continue;
        }
        if settings.add_repository(&repo) {
            added += 1;
            display::success(&format!("Added: {repo}"));
        } else {
            display::dim(&format!("Already watching: {repo}"));
        }
    }
    if settings.repositories.is_empty() {
        bail!("at least one repository is required");
    }
    if added > 0 {
        display::info("");
    }

    display::info("Step 3: Check interval");
    let answer = prompt("Check interval in minutes (default: 5): ")?;
    let minutes = if answer.is_empty() {
        5
    } else {
        answer
            .parse::<u64>()
            .context("interval must be a positive number")?
    };
    settings.set_poll_interval(minutes);

    settings.save_default()?;
    display::success("\nConfiguration complete!");
    display::info("Run `prr` to start watching for PRs");
    Ok(())
}

async fn set_token() -> Result<()> {
    let token = prompt_token()?;
    let user = github::validate_token(&token)
        .await
        .context("token validation failed")?;

    let mut settings = Settings::load_default()?;
    settings.github_token = token;
    settings.save_default()?;
    display::success(&format!("Valid! Authenticated as @{}", user.login));
    Ok(())
}

fn add_repo(repo: &str) -> Result<()> {
    if !is_valid_repo_slug(repo) {
        bail!("invalid repository format, use: owner/repo");
    }
    let mut settings = Settings::load_default()?;
    if settings.add_repository(repo) {
        settings.save_default()?;
        display::success(&format!("Added: {repo}"));
    } else {
        display::dim(&format!("Already watching: {repo}"));
    }
    Ok(())
}

fn rm_repo(repo: &str) -> Result<()> {
    let mut settings = Settings::load_default()?;
    if !settings.remove_repository(repo) {
        bail!("repository not found: {repo}");
    }
    settings.save_default()?;
    display::success(&format!("Removed: {repo}"));
    Ok(())
}

fn list_repos() -> Result<()> {
    let settings = Settings::load_default()?;
    if settings.repositories.is_empty() {
        display::dim("No repositories configured");
        return Ok(());
    }
    display::info(&format!("Repositories ({}):", settings.repositories.len()));
    for repo in &settings.repositories {
        display::info(&format!("  - {repo}"));
    }
    Ok(())
}

fn interval(minutes: Option<u64>) -> Result<()> {
    let mut settings = Settings::load_default()?;
    match minutes {
        None => {
            display::info(&format!(
                "Current interval: {} minutes",
                settings.poll_interval_minutes
            ));
        }
        Some(0) => bail!("interval must be a positive number of minutes"),
        Some(minutes) => {
            settings.set_poll_interval(minutes);
            settings.save_default()?;
            display::success(&format!("Check interval set to {minutes} minutes"));
        }
    }
    Ok(())
}

fn reminder(state: Toggle) -> Result<()> {
    let mut settings = Settings::load_default()?;
    settings.reminder_enabled = matches!(state, Toggle::On);
    settings.save_default()?;
    display::success(&format!(
        "Reminders {}",
        if settings.reminder_enabled { "enabled" } else { "disabled" }
    ));
    Ok(())
}

fn reminder_interval(minutes: Option<u64>) -> Result<()> {
    let mut settings = Settings::load_default()?;
    match minutes {
        None => {
            display::info(&format!(
                "Current reminder interval: {} minutes",
                settings.reminder_interval_minutes
            ));
        }
        Some(0) => bail!("reminder interval must be a positive number of minutes"),
        Some(minutes) => {
            settings.set_reminder_interval(minutes);
            settings.save_default()?;
            display::success(&format!("Reminder interval set to {minutes} minutes"));
        }
    }
    Ok(())
}

fn clear() -> Result<()> {
    Settings::default().save_default()?;
    let mut store =
        SqliteStateStore::open_default().context("failed to open notification state")?;
    store.clear().context("failed to clear notification state")?;
    display::success("Configuration cleared");
    Ok(())
}

fn prompt(question: &str) -> Result<String> {
    print!("{question}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_token() -> Result<String> {
    print!("Enter GitHub token: ");
    io::stdout().flush()?;
    let token = rpassword::read_password()?.trim().to_string();
    if token.is_empty() {
        bail!("token is required");
    }
    Ok(token)
}
