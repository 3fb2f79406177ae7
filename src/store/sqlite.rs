use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use super::{NotificationStateStore, StoreError};

/// SQLite-backed notification state. A missing database file is simply a
/// fresh empty store; single-statement mutations mean a crash can never leave
/// a half-written state behind.
pub struct SqliteStateStore {
    conn: Connection,
}

impl SqliteStateStore {
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(default_state_path()?)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl NotificationStateStore for SqliteStateStore {
    fn last_notified_at(&self, id: u64) -> Result<Option<DateTime<Utc>>, StoreError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT last_notified_at FROM notified_prs WHERE pr_id = ?1",
                params![id as i64],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(text) => {
                let parsed = DateTime::parse_from_rfc3339(&text)?;
                Ok(Some(parsed.with_timezone(&Utc)))
            }
            None => Ok(None),
        }
    }

    fn set_last_notified_at(&mut self, id: u64, at: DateTime<Utc>) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO notified_prs (pr_id, last_notified_at) VALUES (?1, ?2)
             ON CONFLICT(pr_id) DO UPDATE SET last_notified_at = excluded.last_notified_at",
            params![id as i64, at.to_rfc3339()],
        )?;
        Ok(())
    }

    fn all_ids(&self) -> Result<HashSet<u64>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT pr_id FROM notified_prs")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<i64>, _>>()?;
        Ok(ids.into_iter().map(|id| id as u64).collect())
    }

    fn prune_except(&mut self, live: &HashSet<u64>) -> Result<(), StoreError> {
        let stale: Vec<u64> = self
            .all_ids()?
            .into_iter()
            .filter(|id| !live.contains(id))
            .collect();
        if stale.is_empty() {
            return Ok(());
        }

        let tx = self.conn.transaction()?;
        for id in stale {
            tx.execute(
                "DELETE FROM notified_prs WHERE pr_id = ?1",
                params![id as i64],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM notified_prs", [])?;
        Ok(())
    }
}

fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
PRAGMA journal_mode=WAL;
CREATE TABLE IF NOT EXISTS notified_prs (
  pr_id INTEGER PRIMARY KEY,
  last_notified_at TEXT NOT NULL
);
"#,
    )?;
    Ok(())
}

fn default_state_path() -> Result<PathBuf, StoreError> {
    let base = dirs::data_dir().ok_or(StoreError::NoDataDir)?;
    Ok(base.join("prr").join("state.sqlite"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn fresh_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStateStore::open(dir.path().join("state.sqlite")).unwrap();
        assert!(store.all_ids().unwrap().is_empty());
        assert_eq!(store.last_notified_at(42).unwrap(), None);
    }

    #[test]
    fn set_and_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SqliteStateStore::open(dir.path().join("state.sqlite")).unwrap();

        store.set_last_notified_at(1, at(1_000)).unwrap();
        assert_eq!(store.last_notified_at(1).unwrap(), Some(at(1_000)));

        // Restamping overwrites, not duplicates.
        store.set_last_notified_at(1, at(2_000)).unwrap();
        assert_eq!(store.last_notified_at(1).unwrap(), Some(at(2_000)));
        assert_eq!(store.all_ids().unwrap().len(), 1);
    }

    #[test]
    fn state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.sqlite");
        {
            let mut store = SqliteStateStore::open(&path).unwrap();
            store.set_last_notified_at(7, at(500)).unwrap();
        }
        let store = SqliteStateStore::open(&path).unwrap();
        assert_eq!(store.last_notified_at(7).unwrap(), Some(at(500)));
    }

    #[test]
    fn prune_keeps_only_live_ids() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SqliteStateStore::open(dir.path().join("state.sqlite")).unwrap();
        for id in [1, 2, 3] {
            store.set_last_notified_at(id, at(100)).unwrap();
        }

        let live: HashSet<u64> = [1, 3].into_iter().collect();
        store.prune_except(&live).unwrap();
        assert_eq!(store.all_ids().unwrap(), live);
    }

    #[test]
    fn clear_empties_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SqliteStateStore::open(dir.path().join("state.sqlite")).unwrap();
        store.set_last_notified_at(1, at(100)).unwrap();
        store.clear().unwrap();
        assert!(store.all_ids().unwrap().is_empty());
    }
}
