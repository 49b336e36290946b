//! Persistent key-value tier backed by `SQLite`.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, OptionalExtension};

use super::connection::open_db;

/// Unbounded persistent mapping of request URL to raw response body.
///
/// Every `put` is committed before the call returns. Rows are only removed
/// on explicit request; growth is an external maintenance concern. A mutex
/// around the connection makes each operation atomic with respect to
/// concurrent callers.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct DurableStore {
    /// Serialized database handle.
    conn: Mutex<Connection>,
}

impl DurableStore {
    /// Opens (or creates) the store under `dir`, running migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(dir: Option<&PathBuf>) -> Result<Self> {
        let conn = open_db(dir)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens an in-memory store (tests and throwaway sessions).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        super::migrations::run_migrations(&conn).context("database migration failed")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Reads the entry for `key`, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the database read fails.
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let conn = self.lock()?;
        conn.query_row("SELECT value FROM cache WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()
        .with_context(|| format!("failed to read cache entry for {key}"))
    }

    /// Upserts `value` under `key`. An existing entry is fully replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO cache (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )
        .with_context(|| format!("failed to write cache entry for {key}"))?;
        Ok(())
    }

    /// Deletes the row for `key` if present; no-op otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn remove(&self, key: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM cache WHERE key = ?1", [key])
            .with_context(|| format!("failed to delete cache entry for {key}"))?;
        Ok(())
    }

    /// Membership test.
    ///
    /// # Errors
    ///
    /// Returns an error if the database read fails.
    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Streams all stored `(key, value)` pairs through `visit`, row by row.
    ///
    /// Maintenance/inspection helper, not used on the lookup path. Calling
    /// again restarts the scan from the beginning.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or `visit` returns an error.
    pub fn scan(&self, mut visit: impl FnMut(&str, &[u8]) -> Result<()>) -> Result<()> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT key, value FROM cache ORDER BY key")
            .context("failed to prepare cache scan")?;
        let mut rows = stmt.query([]).context("failed to run cache scan")?;
        while let Some(row) = rows.next().context("failed to step cache scan")? {
            let key: String = row.get(0).context("failed to read cache key")?;
            let value: Vec<u8> = row.get(1).context("failed to read cache value")?;
            visit(&key, &value)?;
        }
        Ok(())
    }

    /// Number of stored rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the count query fails.
    pub fn len(&self) -> Result<usize> {
        let conn = self.lock()?;
        conn.query_row("SELECT COUNT(*) FROM cache", [], |row| row.get(0))
            .context("failed to count cache entries")
    }

    /// Whether the store holds no rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the count query fails.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Locks the connection, converting poison into a plain error.
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("durable store lock poisoned"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn temp_store() -> (tempfile::TempDir, DurableStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DurableStore::open(Some(&dir.path().to_path_buf())).unwrap();
        (dir, store)
    }

    #[test]
    fn test_round_trip_is_byte_exact() {
        // Arrange
        let (_dir, store) = temp_store();
        let payload = vec![0x00, 0xFF, 0x7F, 0x80, 0x0A];

        // Act
        store.put("https://example.test/a", &payload).unwrap();
        let loaded = store.get("https://example.test/a").unwrap();

        // Assert
        assert_eq!(loaded, Some(payload));
    }

    #[test]
    fn test_get_missing_returns_none() {
        // Arrange
        let (_dir, store) = temp_store();

        // Act & Assert
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_put_replaces_existing_value() {
        // Arrange
        let (_dir, store) = temp_store();
        store.put("k", b"old").unwrap();

        // Act
        store.put("k", b"new").unwrap();

        // Assert
        assert_eq!(store.get("k").unwrap(), Some(b"new".to_vec()));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        // Arrange
        let (_dir, store) = temp_store();
        store.put("k", b"v").unwrap();

        // Act
        store.remove("missing").unwrap();
        store.remove("k").unwrap();

        // Assert
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_get_does_not_mutate_value() {
        // Arrange
        let (_dir, store) = temp_store();
        store.put("k", b"stable").unwrap();

        // Act
        store.get("k").unwrap();
        store.get("k").unwrap();

        // Assert
        assert_eq!(store.get("k").unwrap(), Some(b"stable".to_vec()));
    }

    #[test]
    fn test_entries_survive_reopen() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let dir_path = dir.path().to_path_buf();
        {
            let store = DurableStore::open(Some(&dir_path)).unwrap();
            store.put("persist", b"across restarts").unwrap();
        }

        // Act
        let reopened = DurableStore::open(Some(&dir_path)).unwrap();

        // Assert
        assert_eq!(
            reopened.get("persist").unwrap(),
            Some(b"across restarts".to_vec())
        );
    }

    #[test]
    fn test_scan_visits_all_rows_and_restarts() {
        // Arrange
        let (_dir, store) = temp_store();
        store.put("a", b"1").unwrap();
        store.put("b", b"2").unwrap();

        // Act
        let mut first = Vec::new();
        store
            .scan(|key, value| {
                first.push((String::from(key), value.to_vec()));
                Ok(())
            })
            .unwrap();
        let mut second = Vec::new();
        store
            .scan(|key, _| {
                second.push(String::from(key));
                Ok(())
            })
            .unwrap();

        // Assert
        assert_eq!(
            first,
            vec![
                (String::from("a"), b"1".to_vec()),
                (String::from("b"), b"2".to_vec()),
            ]
        );
        assert_eq!(second, vec![String::from("a"), String::from("b")]);
    }

    #[test]
    fn test_urls_differing_by_one_character_are_distinct_keys() {
        // Arrange
        let (_dir, store) = temp_store();

        // Act
        store.put("https://example.test/a", b"1").unwrap();
        store.put("https://example.test/a/", b"2").unwrap();

        // Assert
        assert_eq!(store.len().unwrap(), 2);
    }
}
