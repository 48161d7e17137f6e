use serde::{Deserialize, Serialize};

/// A saved timestamp within a video.
///
/// Identity within a video's list is the exact `time` value; there is no
/// separate ID. At most one bookmark per time exists per video; adding at
/// an occupied time replaces the existing entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bookmark {
    /// Playback position in seconds.
    pub time: f64,
    /// User description, never empty after store validation.
    pub desc: String,
    /// Creation or last-edit time, milliseconds since the UNIX epoch.
    #[serde(default)]
    pub timestamp: i64,
}

impl Bookmark {
    pub fn new(time: f64, desc: impl Into<String>, timestamp: i64) -> Self {
        Self {
            time,
            desc: desc.into(),
            timestamp,
        }
    }

    /// A bookmark is valid when its time is a finite non-negative number
    /// and its description is non-empty after trimming.
    pub fn is_valid(&self) -> bool {
        self.time.is_finite() && self.time >= 0.0 && !self.desc.trim().is_empty()
    }
}
