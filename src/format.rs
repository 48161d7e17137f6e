//! Time and date formatting utilities.
//!
//! Pure functions shared by the store (default descriptions), the popup
//! presenter (search against formatted times, date column) and error
//! messages.

use chrono::DateTime;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Formats a playback position in seconds as `HH:MM:SS`.
///
/// Non-finite or negative inputs format as `00:00:00` rather than failing.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "00:00:00".to_string();
    }

    let total = seconds.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Formats a creation timestamp relative to `now_ms`.
///
/// Returns `""` for a missing timestamp, `"Today"` within one day,
/// `"N days ago"` within a week, and the calendar date beyond that.
pub fn format_date(timestamp_ms: i64, now_ms: i64) -> String {
    if timestamp_ms <= 0 {
        return String::new();
    }

    let diff = (now_ms - timestamp_ms).abs();
    // Ceiling day count, so anything within the first 24h reads as day 1.
    let days = (diff + DAY_MS - 1) / DAY_MS;

    if days <= 1 {
        "Today".to_string()
    } else if days <= 7 {
        format!("{} days ago", days)
    } else {
        match DateTime::from_timestamp_millis(timestamp_ms) {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => String::new(),
        }
    }
}

/// Current wall-clock time in milliseconds since the UNIX epoch.
pub fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
