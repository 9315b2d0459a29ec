// Declaro — Durable Key-Value Store
//
// Each repository persists its full state as one JSON document under its own
// namespaced key. Writes always replace the whole value.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::params;

use super::db::Database;
use super::KvError;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the durable key-value backend.
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str) -> Result<(), KvError>;

}

// ─── SQLite Implementation ──────────────────────────────────────────────────

pub struct SqliteKvStore {
    db: Arc<Database>,
}

impl SqliteKvStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl KvStore for SqliteKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare("SELECT value FROM kv_entries WHERE key = ?1")?;
        let mut rows = stmt.query_map(params![key], |row| row.get::<_, String>(0))?;

        match rows.next() {
            Some(Ok(value)) => Ok(Some(value)),
            Some(Err(e)) => Err(KvError::Database(e)),
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), KvError> {
        let now = Utc::now().to_rfc3339();
        self.db.conn()?.execute(
            "INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;

        tracing::debug!(key = %key, bytes = value.len(), "Entry written");
        Ok(())
    }

}

// ─── In-Memory Implementation ───────────────────────────────────────────────

/// Process-local store; contents vanish with the value.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let entries = self.entries.lock().map_err(|_| KvError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), KvError> {
        let mut entries = self.entries.lock().map_err(|_| KvError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite_store() -> SqliteKvStore {
        SqliteKvStore::new(Arc::new(Database::open_in_memory().unwrap()))
    }

    #[test]
    fn test_get_missing_key_returns_none() {
        let store = sqlite_store();
        assert!(store.get("auth-storage").unwrap().is_none());
    }

    #[test]
    fn test_put_overwrites_previous_value() {
        let store = sqlite_store();
        store.put("declaration-storage", "{\"v\":1}").unwrap();
        store.put("declaration-storage", "{\"v\":2}").unwrap();

        assert_eq!(
            store.get("declaration-storage").unwrap().as_deref(),
            Some("{\"v\":2}")
        );

        let count: i64 = store
            .db
            .conn()
            .unwrap()
            .query_row("SELECT count(*) FROM kv_entries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1, "Overwrite must not create a second row");
    }

    #[test]
    fn test_keys_are_independent() {
        let store = sqlite_store();
        store.put("auth-storage", "a").unwrap();
        store.put("declaration-storage", "d").unwrap();

        assert_eq!(store.get("auth-storage").unwrap().as_deref(), Some("a"));
        assert_eq!(store.get("declaration-storage").unwrap().as_deref(), Some("d"));
    }

    #[test]
    fn test_sqlite_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kv.db");

        {
            let store = SqliteKvStore::new(Arc::new(Database::open(&path).unwrap()));
            store.put("auth-storage", "persisted").unwrap();
        }

        let store = SqliteKvStore::new(Arc::new(Database::open(&path).unwrap()));
        assert_eq!(store.get("auth-storage").unwrap().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryKvStore::new();
        assert!(store.get("k").unwrap().is_none());
        store.put("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.put("k", "w").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("w"));
    }
}
