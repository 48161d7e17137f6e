//! SQLite-backed key-value store.
//!
//! Provides the [`KvDatabase`] struct that wraps a `rusqlite::Connection`
//! and automatically runs schema migrations on open.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};

use super::migrations;
use super::KeyValueBackend;
use crate::types::errors::StorageError;

/// Key-value store backed by a single SQLite connection.
///
/// The connection sits behind a `Mutex` so one instance can be shared
/// across the contexts; every call locks, runs one statement, unlocks.
pub struct KvDatabase {
    conn: Mutex<Connection>,
}

impl KvDatabase {
    /// Opens (or creates) a SQLite database at the given file path and runs migrations.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the connection cannot be established or migrations fail.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        migrations::run_all(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens an in-memory SQLite database and runs migrations.
    ///
    /// Useful for testing; the database is discarded on drop.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the connection cannot be established or migrations fail.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        migrations::run_all(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl KeyValueBackend for KvDatabase {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let result = conn.query_row(
            "SELECT value FROM bookmarks_kv WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::Backend(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let now = crate::format::now_ms();
        conn.execute(
            "INSERT OR REPLACE INTO bookmarks_kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, now],
        )
        .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(())
    }
}
