//! Bookmark store.
//!
//! Owns the bookmark list for each video identifier: load, add, update and
//! remove, persisted as a JSON array under the video id in the key-value
//! backend. The list is kept sorted ascending by time with at most one
//! entry per exact time value after every mutation.
//!
//! All mutations are read-modify-write with no optimistic-concurrency
//! guard: two writers on the same key (popup and page context) can race
//! and the later write wins. This matches the storage backend's
//! last-write-wins semantics and is an accepted limitation.

use std::sync::Arc;

use tracing::warn;

use crate::database::KeyValueBackend;
use crate::format::{format_time, now_ms};
use crate::retry::RetryPolicy;
use crate::types::errors::{BookmarkError, StorageError};
use crate::types::Bookmark;

/// Bookmark store over a shared key-value backend.
#[derive(Clone)]
pub struct BookmarkStore {
    backend: Arc<dyn KeyValueBackend>,
    retry: RetryPolicy,
}

impl BookmarkStore {
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self {
            backend,
            retry: RetryPolicy::storage(),
        }
    }

    /// Overrides the persistence retry policy. Used by tests.
    pub fn with_retry(backend: Arc<dyn KeyValueBackend>, retry: RetryPolicy) -> Self {
        Self { backend, retry }
    }

    /// Loads the bookmark list for a video.
    ///
    /// A missing key, a backend read failure, or a corrupt value all yield
    /// an empty list: corrupt data means "no bookmarks", never a fatal
    /// error. Loaded lists are normalized (sorted, deduplicated).
    pub fn load(&self, video_id: &str) -> Vec<Bookmark> {
        let raw = match self.backend.get(video_id) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(video_id, error = %err, "bookmark read failed, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Bookmark>>(&raw) {
            Ok(mut list) => {
                normalize(&mut list);
                list
            }
            Err(err) => {
                warn!(video_id, error = %err, "corrupt bookmark data, treating as empty");
                Vec::new()
            }
        }
    }

    /// Adds a bookmark at `time`, replacing any existing entry at the
    /// exact same time (last write wins).
    ///
    /// An empty description defaults to `"Bookmark at HH:MM:SS"`. The
    /// creation timestamp is set to now. Returns the persisted list.
    pub async fn add(
        &self,
        video_id: &str,
        time: f64,
        desc: &str,
    ) -> Result<Vec<Bookmark>, BookmarkError> {
        if !time.is_finite() || time < 0.0 {
            return Err(BookmarkError::InvalidTime(time));
        }

        let desc = desc.trim();
        let desc = if desc.is_empty() {
            format!("Bookmark at {}", format_time(time))
        } else {
            desc.to_string()
        };

        let mut list = self.load(video_id);
        list.retain(|b| b.time.to_bits() != time.to_bits());
        list.push(Bookmark::new(time, desc, now_ms()));
        normalize(&mut list);

        self.persist(video_id, &list).await?;
        Ok(list)
    }

    /// Updates the description of the bookmark at `time`, bumping its
    /// timestamp. Returns the persisted list.
    pub async fn update(
        &self,
        video_id: &str,
        time: f64,
        new_desc: &str,
    ) -> Result<Vec<Bookmark>, BookmarkError> {
        let new_desc = new_desc.trim();
        if new_desc.is_empty() {
            return Err(BookmarkError::EmptyDescription);
        }

        let mut list = self.load(video_id);
        let entry = list
            .iter_mut()
            .find(|b| b.time.to_bits() == time.to_bits())
            .ok_or(BookmarkError::NotFound {
                video_id: video_id.to_string(),
                time,
            })?;

        entry.desc = new_desc.to_string();
        entry.timestamp = now_ms();

        self.persist(video_id, &list).await?;
        Ok(list)
    }

    /// Removes the bookmark at `time`. A second remove of the same time is
    /// a no-op, not an error. Returns the persisted list.
    pub async fn remove(
        &self,
        video_id: &str,
        time: f64,
    ) -> Result<Vec<Bookmark>, BookmarkError> {
        let mut list = self.load(video_id);
        list.retain(|b| b.time.to_bits() != time.to_bits());

        // The key keeps an empty array after the last delete.
        self.persist(video_id, &list).await?;
        Ok(list)
    }

    /// Serializes and writes the list, retrying per the store policy
    /// before surfacing the failure.
    async fn persist(&self, video_id: &str, list: &[Bookmark]) -> Result<(), BookmarkError> {
        let value = serde_json::to_string(list)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        self.retry
            .run(|| self.backend.set(video_id, &value))
            .await
            .map_err(|err| {
                StorageError::RetriesExhausted {
                    attempts: self.retry.max_attempts(),
                    last_error: err.to_string(),
                }
                .into()
            })
    }
}

/// Sorts ascending by time and drops duplicate times.
fn normalize(list: &mut Vec<Bookmark>) {
    list.sort_by(|a, b| a.time.total_cmp(&b.time));
    list.dedup_by(|a, b| a.time.to_bits() == b.time.to_bits());
}
