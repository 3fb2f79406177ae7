use anyhow::Result;

use crate::config::Settings;
use crate::display;
use crate::github;

/// Show current configuration and check the token against the API.
pub async fn run() -> Result<()> {
    let settings = Settings::load_default()?;

    println!();
    if settings.github_token.is_empty() {
        display::error("Configuration: not configured");
        display::info("Run `prr config` to set up");
        return Ok(());
    }

    match github::validate_token(&settings.github_token).await {
        Ok(user) => {
            display::success("Configuration: valid");
            display::info(&format!("User: @{}", user.login));
        }
        Err(err) => {
            display::error("Configuration: invalid token");
            display::dim(&format!("Error: {err}"));
        }
    }

    println!();
    display::info(&format!("Repositories: {}", settings.repositories.len()));
    for repo in &settings.repositories {
        display::dim(&format!("  - {repo}"));
    }

    println!();
    display::info(&format!(
        "Check interval: {} minutes",
        settings.poll_interval_minutes
    ));
    display::info(&format!(
        "Reminders: {} (every {} minutes)",
        if settings.reminder_enabled { "on" } else { "off" },
        settings.reminder_interval_minutes
    ));
    println!();

    Ok(())
}
