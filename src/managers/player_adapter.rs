//! Player control adapter.
//!
//! Mediates between the page context and the video player. The player and
//! its controls bar live outside this crate (the DOM); [`PlayerSurface`]
//! is the capability trait standing in for those queries and mutations,
//! and [`PlayerAdapter`] layers validation, fallbacks and idempotent
//! control injection on top.

use tracing::{debug, warn};

use crate::types::errors::PlayerError;
use crate::types::VideoData;

/// DOM capability: presence queries, read-only player state, seek, and
/// the bookmark control's existence/installation.
pub trait PlayerSurface: Send {
    /// Whether the player controls bar is present on the page.
    fn controls_present(&self) -> bool;
    /// Whether the media element is present on the page.
    fn player_present(&self) -> bool;

    /// Current playback position in seconds, if the player is ready.
    fn current_time(&self) -> Option<f64>;
    /// Video duration in seconds, if known.
    fn duration(&self) -> Option<f64>;
    /// Video title, if the page exposes one.
    fn title(&self) -> Option<String>;
    /// Thumbnail URL, if the page exposes one.
    fn thumbnail_url(&self) -> Option<String>;

    /// Sets the playback position. Returns false when the player refused.
    fn seek(&mut self, time: f64) -> bool;

    /// Whether the bookmark control is already in the controls bar.
    fn control_installed(&self) -> bool;
    /// Inserts the bookmark control. Returns false when the bar is missing.
    fn install_control(&mut self) -> bool;
}

/// Result of a locate pass over the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocateOutcome {
    pub controls_found: bool,
    pub player_found: bool,
}

impl LocateOutcome {
    pub fn ready(&self) -> bool {
        self.controls_found && self.player_found
    }
}

/// Adapter over a [`PlayerSurface`].
pub struct PlayerAdapter<S: PlayerSurface> {
    surface: S,
}

impl<S: PlayerSurface> PlayerAdapter<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    /// Queries the page for the controls bar and the media element.
    ///
    /// The page may still be rendering; the caller re-schedules injection
    /// until both are found.
    pub fn locate(&self) -> LocateOutcome {
        LocateOutcome {
            controls_found: self.surface.controls_present(),
            player_found: self.surface.player_present(),
        }
    }

    /// Seeks to `time`.
    ///
    /// Rejected (reported, not panicked) when no player is located or the
    /// target is not a finite non-negative number.
    pub fn seek(&mut self, time: f64) -> Result<(), PlayerError> {
        if !time.is_finite() || time < 0.0 {
            return Err(PlayerError::InvalidSeekTarget(time));
        }
        if !self.surface.player_present() {
            return Err(PlayerError::PlayerNotFound);
        }
        if !self.surface.seek(time) {
            return Err(PlayerError::PlayerNotFound);
        }
        debug!(time, "seeked player");
        Ok(())
    }

    /// Current playback position; 0.0 when the player is not ready.
    pub fn current_time(&self) -> f64 {
        self.surface.current_time().unwrap_or(0.0)
    }

    /// Video duration; 0.0 when unknown.
    pub fn duration(&self) -> f64 {
        self.surface.duration().unwrap_or(0.0)
    }

    /// Title and thumbnail with best-effort fallbacks. Missing metadata
    /// yields placeholders, never an error.
    pub fn metadata(&self) -> VideoData {
        VideoData {
            title: self
                .surface
                .title()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Unknown Video".to_string()),
            duration: self.duration(),
            thumbnail: self.surface.thumbnail_url().unwrap_or_default(),
        }
    }

    /// Installs the bookmark control once.
    ///
    /// Idempotent: an already-present control means do nothing. Returns
    /// true when the control exists after the call.
    pub fn inject_control(&mut self) -> bool {
        if self.surface.control_installed() {
            return true;
        }
        let outcome = self.locate();
        if !outcome.ready() {
            warn!(?outcome, "player controls not found, injection deferred");
            return false;
        }
        self.surface.install_control()
    }
}
