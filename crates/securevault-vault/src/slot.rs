//! Named key-value slots.
//!
//! The vault persists to a single named entry (the whole store as one JSON
//! blob) and keeps navigation context in a second, ephemeral entry. Both go
//! through the [`KvSlot`] trait:
//!
//! - [`SqliteSlot`]: durable slots in a SQLite `kv_slots` table.
//! - [`MemorySlot`]: process-lifetime slots, used for the session slot and
//!   in tests.
//!
//! Writes are synchronous and overwrite the previous value wholesale.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::{Result, VaultError};

/// Key holding the serialized vault store.
pub const VAULT_DATA_KEY: &str = "secureVaultData";

/// Key holding the currently selected category name.
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A string key-value store with whole-value reads and writes.
pub trait KvSlot: Send {
    /// Read the value stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Store (or overwrite) the value under `key`.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the value under `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// SQLite
// ---------------------------------------------------------------------------

/// Durable key-value slots backed by SQLite.
pub struct SqliteSlot {
    conn: Connection,
}

impl SqliteSlot {
    /// Open (or create) the slot database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Persistence`] if the database cannot be opened or
    /// the table cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "opening slot database");

        let conn = Connection::open(path)?;
        Self::configure_connection(&conn)?;

        let slot = Self { conn };
        slot.create_table()?;
        Ok(slot)
    }

    /// Open an in-memory slot database (useful for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure_connection(&conn)?;

        let slot = Self { conn };
        slot.create_table()?;
        Ok(slot)
    }

    fn configure_connection(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    }

    fn create_table(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv_slots (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );",
        )?;
        Ok(())
    }
}

impl KvSlot for SqliteSlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        tracing::debug!(key, found = value.is_some(), "read slot");
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().timestamp_millis()],
        )?;
        tracing::debug!(key, bytes = value.len(), "wrote slot");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv_slots WHERE key = ?1", params![key])?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Memory
// ---------------------------------------------------------------------------

/// Process-lifetime key-value slots.
#[derive(Debug, Default)]
pub struct MemorySlot {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| VaultError::Internal(format!("slot mutex poisoned: {e}")))
    }
}

impl KvSlot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

impl<T: KvSlot + Sync> KvSlot for std::sync::Arc<T> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
