//! Unit tests for the time/date formatting utilities.

use rstest::rstest;

use seekmark::format::{format_date, format_time};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[rstest]
#[case(0.0, "00:00:00")]
#[case(5.0, "00:00:05")]
#[case(59.9, "00:00:59")]
#[case(60.0, "00:01:00")]
#[case(125.0, "00:02:05")]
#[case(3600.0, "01:00:00")]
#[case(3661.0, "01:01:01")]
#[case(86399.0, "23:59:59")]
fn test_format_time_cases(#[case] seconds: f64, #[case] expected: &str) {
    assert_eq!(format_time(seconds), expected);
}

#[test]
fn test_format_time_tolerates_bad_input() {
    assert_eq!(format_time(f64::NAN), "00:00:00");
    assert_eq!(format_time(f64::INFINITY), "00:00:00");
    assert_eq!(format_time(-12.0), "00:00:00");
}

#[test]
fn test_format_date_missing_timestamp_is_empty() {
    assert_eq!(format_date(0, 1_700_000_000_000), "");
    assert_eq!(format_date(-1, 1_700_000_000_000), "");
}

#[test]
fn test_format_date_today_within_one_day() {
    let now = 1_700_000_000_000;
    assert_eq!(format_date(now, now), "Today");
    assert_eq!(format_date(now - DAY_MS / 2, now), "Today");
    assert_eq!(format_date(now - DAY_MS, now), "Today");
}

#[test]
fn test_format_date_days_ago_within_week() {
    let now = 1_700_000_000_000;
    assert_eq!(format_date(now - 2 * DAY_MS, now), "2 days ago");
    assert_eq!(format_date(now - 7 * DAY_MS, now), "7 days ago");
}

#[test]
fn test_format_date_calendar_beyond_week() {
    let now = 1_700_000_000_000;
    let old = now - 30 * DAY_MS;
    let formatted = format_date(old, now);
    // Calendar form: YYYY-MM-DD
    assert_eq!(formatted.len(), 10);
    assert!(formatted.chars().filter(|c| *c == '-').count() == 2);
}
