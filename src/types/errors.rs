use std::fmt;

use crate::format::format_time;

// === StorageError ===

/// Errors raised by the persistent key-value backend.
#[derive(Debug)]
pub enum StorageError {
    /// The underlying backend (SQLite) failed.
    Backend(String),
    /// Serializing a value for storage failed.
    Serialization(String),
    /// A write kept failing after the bounded retry count.
    RetriesExhausted { attempts: u32, last_error: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Backend(msg) => write!(f, "Storage backend error: {}", msg),
            StorageError::Serialization(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
            StorageError::RetriesExhausted {
                attempts,
                last_error,
            } => write!(
                f,
                "Storage write failed after {} attempts: {}",
                attempts, last_error
            ),
        }
    }
}

impl std::error::Error for StorageError {}

// === BookmarkError ===

/// Errors related to bookmark store operations.
#[derive(Debug)]
pub enum BookmarkError {
    /// No bookmark exists at the given time for this video.
    NotFound { video_id: String, time: f64 },
    /// The bookmark time is not a finite non-negative number.
    InvalidTime(f64),
    /// The description is empty after trimming.
    EmptyDescription,
    /// Persisting the list failed.
    Storage(StorageError),
}

impl fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkError::NotFound { video_id, time } => write!(
                f,
                "No bookmark at {} for video {}",
                format_time(*time),
                video_id
            ),
            BookmarkError::InvalidTime(time) => {
                write!(f, "Invalid bookmark time: {}", time)
            }
            BookmarkError::EmptyDescription => write!(f, "Bookmark description is empty"),
            BookmarkError::Storage(err) => write!(f, "Bookmark storage error: {}", err),
        }
    }
}

impl std::error::Error for BookmarkError {}

impl From<StorageError> for BookmarkError {
    fn from(err: StorageError) -> Self {
        BookmarkError::Storage(err)
    }
}

// === RouterError ===

/// Errors related to message delivery between contexts.
#[derive(Debug)]
pub enum RouterError {
    /// The target context is not registered or has shut down.
    ContextUnavailable(String),
    /// The handler dropped the reply channel without answering.
    ReplyDropped(String),
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::ContextUnavailable(ctx) => {
                write!(f, "Context unavailable: {}", ctx)
            }
            RouterError::ReplyDropped(ctx) => {
                write!(f, "Reply dropped by context: {}", ctx)
            }
        }
    }
}

impl std::error::Error for RouterError {}

// === PlayerError ===

/// Errors related to the player control adapter.
#[derive(Debug)]
pub enum PlayerError {
    /// No media element has been located on the page.
    PlayerNotFound,
    /// The seek target is not a finite non-negative number.
    InvalidSeekTarget(f64),
}

impl fmt::Display for PlayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerError::PlayerNotFound => write!(f, "Video player not found"),
            PlayerError::InvalidSeekTarget(time) => {
                write!(f, "Invalid seek target: {}", time)
            }
        }
    }
}

impl std::error::Error for PlayerError {}
