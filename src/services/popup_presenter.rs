//! Popup filter/sort pipeline.
//!
//! Pure functions over the loaded bookmark list:
//! `filter(search) → filter(date range) → sort(key)`. The pipeline works
//! on a copy and never mutates the store's list; re-filtering is just
//! re-running it.

use crate::format::format_time;
use crate::types::Bookmark;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Date-range filter over bookmark creation timestamps.
///
/// Entries with no timestamp count as timestamp 0, so every non-`All`
/// range excludes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    #[default]
    All,
    /// Within the last day.
    Today,
    /// Within the last 7 days.
    Recent,
    /// Same window as `Recent`; kept as a distinct selection.
    Week,
}

impl DateFilter {
    /// Select-option values from the popup document.
    pub fn from_option_value(value: &str) -> Self {
        match value {
            "today" => DateFilter::Today,
            "recent" => DateFilter::Recent,
            "week" => DateFilter::Week,
            _ => DateFilter::All,
        }
    }

    /// Whether a bookmark created at `timestamp` falls inside this range,
    /// with `now_ms` as the reference point.
    pub fn matches(&self, timestamp: i64, now_ms: i64) -> bool {
        let age = now_ms - timestamp;
        match self {
            DateFilter::All => true,
            DateFilter::Today => age <= DAY_MS,
            DateFilter::Recent | DateFilter::Week => age <= 7 * DAY_MS,
        }
    }
}

/// Sort key for the rendered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Ascending by playback position.
    #[default]
    Time,
    /// Ascending, case-insensitive, by description.
    Description,
    /// Newest first by creation timestamp; missing timestamps sort oldest.
    Date,
}

impl SortKey {
    pub fn from_option_value(value: &str) -> Self {
        match value {
            "description" => SortKey::Description,
            "date" => SortKey::Date,
            _ => SortKey::Time,
        }
    }
}

/// The popup's current search/filter/sort selection.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub search: String,
    pub date_filter: DateFilter,
    pub sort: SortKey,
}

/// Runs the pipeline against `now_ms` as the date-filter reference point.
///
/// Returns a fresh working copy; `bookmarks` is untouched.
pub fn apply(bookmarks: &[Bookmark], query: &Query, now_ms: i64) -> Vec<Bookmark> {
    let search = query.search.trim().to_lowercase();

    let mut working: Vec<Bookmark> = bookmarks
        .iter()
        .filter(|b| {
            search.is_empty()
                || b.desc.to_lowercase().contains(&search)
                || format_time(b.time).contains(&search)
        })
        .filter(|b| query.date_filter.matches(b.timestamp, now_ms))
        .cloned()
        .collect();

    match query.sort {
        SortKey::Time => working.sort_by(|a, b| a.time.total_cmp(&b.time)),
        SortKey::Description => {
            working.sort_by(|a, b| a.desc.to_lowercase().cmp(&b.desc.to_lowercase()))
        }
        SortKey::Date => working.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
    }

    working
}

/// Resolves the edit-prompt result for a bookmark.
///
/// `input` is what the blocking prompt returned: `None` when dismissed.
/// Empty-after-trim or unchanged input cancels the edit: no store
/// mutation, no timestamp bump. Returns the description to store.
pub fn resolve_edit(current_desc: &str, input: Option<&str>) -> Option<String> {
    let trimmed = input?.trim();
    if trimmed.is_empty() || trimmed == current_desc {
        return None;
    }
    Some(trimmed.to_string())
}
