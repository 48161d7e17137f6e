//! Video session tracker.
//!
//! Watches navigation events for watch-page URLs and tracks which video
//! is active. Two states: `Idle` (no video) and `Active(video_id)`; the
//! transition fires only when navigation lands on a watch page whose
//! parsed id differs from the current one.

use tracing::warn;
use url::Url;

/// Tracker state: no active video, or the id of the active one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active(String),
}

/// Navigation-driven video session state machine.
#[derive(Debug)]
pub struct SessionTracker {
    state: SessionState,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The active video id, if any.
    pub fn current_video(&self) -> Option<&str> {
        match &self.state {
            SessionState::Active(id) => Some(id),
            SessionState::Idle => None,
        }
    }

    /// Feeds a navigation event.
    ///
    /// Returns `Some(video_id)` when the event moves the tracker to a new
    /// active video; the caller is responsible for notifying the page
    /// context. A URL with no parsable video id leaves the state unchanged
    /// (a warning is the only observable effect), as does re-navigating to
    /// the already-active video.
    pub fn observe_navigation(&mut self, url: &str) -> Option<String> {
        let video_id = match parse_video_id(url) {
            Some(id) => id,
            None => {
                warn!(url, "navigation without a parsable video id, ignoring");
                return None;
            }
        };

        if self.current_video() == Some(video_id.as_str()) {
            return None;
        }

        self.state = SessionState::Active(video_id.clone());
        Some(video_id)
    }
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts the video identifier from a watch-page URL.
///
/// Matches hosts under `youtube.com` with a `/watch` path and a non-empty
/// `v` query parameter; anything else yields `None`.
pub fn parse_video_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    if host != "youtube.com" && !host.ends_with(".youtube.com") {
        return None;
    }
    if parsed.path() != "/watch" {
        return None;
    }
    parsed
        .query_pairs()
        .find(|(k, _)| k == "v")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}
