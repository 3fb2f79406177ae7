pub mod memory;
pub mod sqlite;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("notification state database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("failed to prepare notification state directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not resolve a data directory for notification state")]
    NoDataDir,
    #[error("corrupt timestamp in notification state: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

/// Durable mapping of pull-request id to the time it was last notified.
///
/// The key set is pruned to the currently pending ids every cycle, so stale
/// entries never accumulate across merges, closes, or completed reviews.
pub trait NotificationStateStore {
    fn last_notified_at(&self, id: u64) -> Result<Option<DateTime<Utc>>, StoreError>;
    fn set_last_notified_at(&mut self, id: u64, at: DateTime<Utc>) -> Result<(), StoreError>;
    fn all_ids(&self) -> Result<HashSet<u64>, StoreError>;
    fn prune_except(&mut self, live: &HashSet<u64>) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}
