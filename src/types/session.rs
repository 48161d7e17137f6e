use serde::{Deserialize, Serialize};

/// Snapshot of the currently playing video, as reported to the popup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoData {
    pub title: String,
    /// Duration in seconds; 0.0 when the player has not reported one.
    pub duration: f64,
    /// Thumbnail URL, empty when unavailable.
    pub thumbnail: String,
}

impl Default for VideoData {
    fn default() -> Self {
        Self {
            title: String::new(),
            duration: 0.0,
            thumbnail: String::new(),
        }
    }
}

/// The active video in the page context.
///
/// Constructed fresh on every navigation to a new watch page and replaced
/// wholesale; there is no partial update and no explicit teardown.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSession {
    pub video_id: String,
    pub data: VideoData,
}

impl VideoSession {
    pub fn new(video_id: impl Into<String>, data: VideoData) -> Self {
        Self {
            video_id: video_id.into(),
            data,
        }
    }
}
