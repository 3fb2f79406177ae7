use anyhow::{Context, Result, bail};
use chrono::Utc;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::error;

use crate::config::Settings;
use crate::display;
use crate::github::GithubClient;
use crate::notify::engine::{NotifyEngine, ReminderPolicy};
use crate::notify::{DesktopNotifier, Notifier};
use crate::store::NotificationStateStore;
use crate::store::sqlite::SqliteStateStore;

/// Watch loop: one aggregation + notification pass immediately, then one per
/// poll interval. Cycles run to completion and never overlap; ctrl-c is
/// honored between cycles so the persist step of an in-flight cycle always
/// finishes.
pub async fn run() -> Result<()> {
    let settings = Settings::load_default()?;
    if !settings.is_configured() {
        bail!("not configured; run `prr config` first");
    }

    let client = GithubClient::new(&settings.github_token)?;
    let store = SqliteStateStore::open_default().context("failed to open notification state")?;
    let reminder = ReminderPolicy::from_minutes(
        settings.reminder_enabled,
        settings.reminder_interval_minutes,
    );
    let mut engine = NotifyEngine::new(store, DesktopNotifier, reminder);

    display::info(&format!(
        "Watching {} repositories (checking every {} min)",
        settings.repositories.len(),
        settings.poll_interval_minutes
    ));
    display::info("Press Ctrl+C to stop\n");

    let mut ticker = interval(Duration::from_secs(settings.poll_interval_minutes.max(1) * 60));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                run_once(&client, &settings, &mut engine).await;
            }
            _ = &mut ctrl_c => {
                display::info("\nStopping...");
                break;
            }
        }
    }

    Ok(())
}

async fn run_once<S, N>(client: &GithubClient, settings: &Settings, engine: &mut NotifyEngine<S, N>)
where
    S: NotificationStateStore,
    N: Notifier,
{
    display::timestamped(&format!(
        "Checking {} repositories...",
        settings.repositories.len()
    ));

    match client.fetch_pull_requests(&settings.repositories).await {
        Ok(groups) => {
            engine.run_cycle(&groups.pending, Utc::now());
            if groups.pending.is_empty() {
                display::timestamped("No pending reviews");
            } else {
                display::render_pr_box("Pending Review", &groups.pending);
            }
        }
        // Auth failures land here too; the next tick is the retry.
        Err(err) => error!(error = %err, "fetch cycle failed"),
    }
}
