use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use super::{NotificationStateStore, StoreError};

/// Infallible in-memory store. Used by tests, and as the behavior model the
/// SQLite implementation must match.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    entries: HashMap<u64, DateTime<Utc>>,
}

impl InMemoryStateStore {
    pub fn with_entries(seed: impl IntoIterator<Item = (u64, DateTime<Utc>)>) -> Self {
        Self {
            entries: seed.into_iter().collect(),
        }
    }
}

impl NotificationStateStore for InMemoryStateStore {
    fn last_notified_at(&self, id: u64) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self.entries.get(&id).copied())
    }

    fn set_last_notified_at(&mut self, id: u64, at: DateTime<Utc>) -> Result<(), StoreError> {
        self.entries.insert(id, at);
        Ok(())
    }

    fn all_ids(&self) -> Result<HashSet<u64>, StoreError> {
        Ok(self.entries.keys().copied().collect())
    }

    fn prune_except(&mut self, live: &HashSet<u64>) -> Result<(), StoreError> {
        self.entries.retain(|id, _| live.contains(id));
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        Ok(())
    }
}
