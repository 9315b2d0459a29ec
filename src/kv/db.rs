// Declaro — SQLite Database Management
//
// Opens the SQLite file that backs the durable key-value store and runs the
// schema migrations before any entry is read. The connection sits behind a
// mutex so one `Database` can be shared by both repositories.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use super::KvError;

/// Wrapper around a SQLite connection holding the `kv_entries` table.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database at the given path, creating parent
    /// directories as needed.
    pub fn open(path: &Path) -> Result<Self, KvError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.run_migrations()?;

        tracing::debug!(path = %path.display(), "Database opened");
        Ok(db)
    }

    /// Open a throwaway in-memory database.
    pub fn open_in_memory() -> Result<Self, KvError> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Lock and return the underlying connection.
    pub fn conn(&self) -> Result<MutexGuard<'_, Connection>, KvError> {
        self.conn.lock().map_err(|_| KvError::Poisoned)
    }

    /// Run schema migrations to create or update tables.
    fn run_migrations(&self) -> Result<(), KvError> {
        self.conn()?.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS kv_entries (
                key         TEXT PRIMARY KEY,
                value       TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            );
            ",
        )?;

        tracing::debug!("Database migrations completed successfully");
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
