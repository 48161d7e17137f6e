//! Persistent key-value storage layer.
//!
//! The store maps a video identifier to the JSON-encoded bookmark list
//! for that video. [`KeyValueBackend`] is the capability the rest of the
//! crate programs against; [`KvDatabase`] is the SQLite implementation.
//!
//! # Usage
//!
//! ```no_run
//! use seekmark::database::KvDatabase;
//!
//! // Open a persistent database
//! let db = KvDatabase::open("seekmark.db").expect("failed to open database");
//!
//! // Or use an in-memory database for testing
//! let db = KvDatabase::open_in_memory().expect("failed to open in-memory database");
//! ```

pub mod connection;
pub mod migrations;

pub use connection::KvDatabase;

use crate::types::errors::StorageError;

/// Asynchronous-friendly key-value capability.
///
/// Implementations may fail on any call; callers decide retry policy.
/// `Send + Sync` because the backend is the one resource shared by all
/// three contexts.
pub trait KeyValueBackend: Send + Sync {
    /// Reads the value stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
