use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use super::{NotificationRequest, Notifier};
use crate::domain::pr::PullRequest;
use crate::store::NotificationStateStore;

#[derive(Debug, Clone, Copy)]
pub struct ReminderPolicy {
    pub enabled: bool,
    pub interval: Duration,
}

impl ReminderPolicy {
    pub fn from_minutes(enabled: bool, minutes: u64) -> Self {
        Self {
            enabled,
            interval: Duration::minutes(minutes as i64),
        }
    }
}

/// Decides, once per poll cycle, which pending PRs get a notification.
///
/// Per id the engine distinguishes three implicit states: unseen (not in the
/// known set), seen with no reminder due, and seen with a reminder due. Ids
/// that drop out of the pending set are forgotten entirely, in both the known
/// set and the durable store, so a PR that comes back later counts as new.
///
/// The known set is seeded from the store at construction. A seed with
/// history means this is a restart: the first cycle then behaves exactly like
/// a mid-session one, so previously acknowledged PRs stay quiet while a
/// genuinely new arrival is still announced. Only a seed with no history at
/// all (true first run) triggers the startup baseline, which folds everything
/// pending into a single summary notification instead of one per PR.
pub struct NotifyEngine<S, N> {
    store: S,
    notifier: N,
    reminder: ReminderPolicy,
    known_ids: HashSet<u64>,
    first_check: bool,
}

impl<S: NotificationStateStore, N: Notifier> NotifyEngine<S, N> {
    pub fn new(store: S, notifier: N, reminder: ReminderPolicy) -> Self {
        let known_ids = match store.all_ids() {
            Ok(ids) => ids,
            Err(err) => {
                warn!(error = %err, "could not read notification state; starting from scratch");
                HashSet::new()
            }
        };
        let first_check = known_ids.is_empty();
        Self {
            store,
            notifier,
            reminder,
            known_ids,
            first_check,
        }
    }

    /// Run one cycle against the current pending set. Store failures are
    /// logged and never fatal; the next cycle retries persistence.
    pub fn run_cycle(&mut self, pending: &[PullRequest], now: DateTime<Utc>) {
        let live: HashSet<u64> = pending.iter().map(|pr| pr.id).collect();

        // Forget everything no longer pending (merged, closed, reviewed).
        // Runs every cycle so the store never grows unboundedly.
        if let Err(err) = self.store.prune_except(&live) {
            warn!(error = %err, "failed to prune notification state");
        }
        self.known_ids.retain(|id| live.contains(id));

        if self.first_check {
            self.first_check = false;
            self.admit_baseline(pending, now);
            return;
        }

        for pr in pending {
            if !self.known_ids.contains(&pr.id) {
                self.deliver(&NotificationRequest {
                    title: pr.title.clone(),
                    body: "New PR waiting for your review".to_string(),
                    subtitle: Some(format!("{} #{}", pr.repository, pr.number)),
                    url: Some(pr.url.clone()),
                });
                self.known_ids.insert(pr.id);
                self.stamp(pr.id, now);
                continue;
            }

            // The record lookup happens whether or not reminders are on:
            // a known id without a record means an earlier persist failed,
            // and it must be restored so a restart still seeds the id.
            match self.store.last_notified_at(pr.id) {
                Ok(Some(last)) if self.reminder.enabled && now - last >= self.reminder.interval => {
                    self.deliver(&NotificationRequest {
                        title: format!("Reminder: {}", pr.title),
                        body: "Still waiting for your review".to_string(),
                        subtitle: Some(format!("{} #{}", pr.repository, pr.number)),
                        url: Some(pr.url.clone()),
                    });
                    self.stamp(pr.id, now);
                }
                Ok(Some(_)) => {}
                Ok(None) => self.stamp(pr.id, now),
                Err(err) => warn!(error = %err, pr_id = pr.id, "failed to read notification state"),
            }
        }
    }

    /// First run ever: admit the whole pending set silently and surface one
    /// summary so the user knows reviews are waiting.
    fn admit_baseline(&mut self, pending: &[PullRequest], now: DateTime<Utc>) {
        for pr in pending {
            self.known_ids.insert(pr.id);
            match self.store.last_notified_at(pr.id) {
                Ok(Some(_)) => {}
                Ok(None) => self.stamp(pr.id, now),
                Err(err) => warn!(error = %err, pr_id = pr.id, "failed to read notification state"),
            }
        }

        if !pending.is_empty() {
            self.deliver(&NotificationRequest {
                title: "Pending Reviews".to_string(),
                body: format!("{} PR(s) waiting for review", pending.len()),
                subtitle: None,
                url: None,
            });
        }
    }

    fn deliver(&self, request: &NotificationRequest) {
        // Delivery is best effort; losing a popup must not lose state.
        if let Err(err) = self.notifier.notify(request) {
            debug!(error = %err, title = %request.title, "notification delivery failed");
        }
    }

    fn stamp(&mut self, id: u64, now: DateTime<Utc>) {
        if let Err(err) = self.store.set_last_notified_at(id, now) {
            warn!(error = %err, pr_id = id, "failed to persist notification timestamp");
        }
    }
}
