use anyhow::{Result, bail};

use crate::config::Settings;
use crate::display;
use crate::domain::pr::ReviewState;
use crate::github::GithubClient;

/// One-shot fetch and render of every group, no notifications.
pub async fn run() -> Result<()> {
    let settings = Settings::load_default()?;
    if !settings.is_configured() {
        bail!("not configured; run `prr config` first");
    }

    display::dim(&format!(
        "Fetching PRs from {} repositories...",
        settings.repositories.len()
    ));

    let client = GithubClient::new(&settings.github_token)?;
    let groups = client.fetch_pull_requests(&settings.repositories).await?;

    if groups.pending.is_empty() {
        display::success("No pending reviews!");
    } else {
        display::render_pr_box(ReviewState::Pending.label(), &groups.pending);
    }

    if !groups.changes_requested.is_empty() {
        display::render_pr_box(
            ReviewState::ChangesRequested.label(),
            &groups.changes_requested,
        );
    }

    if !groups.approved.is_empty() {
        display::render_pr_box(ReviewState::Approved.label(), &groups.approved);
    }

    Ok(())
}
