//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use regex::Regex;
use ttg_core::ValidationError;

/// Pre-compiled regex for the `YYYY-MM-DD` shape.
static CALENDAR_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Pre-compiled regex for relative date parsing.
static RELATIVE_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(day|week)s?\s+ago$").unwrap());

/// Conservative bound for relative dates (~1000 years in days).
const MAX_RELATIVE_DAYS: i64 = 1000 * 365;

/// Display format for timestamps in reports.
pub const MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Display format for timestamps in status output.
pub const SECOND_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a date as `YYYY-MM-DD` or relative to `today`.
///
/// Supports:
/// - Calendar dates: "2024-06-01"
/// - Keywords: "today", "yesterday"
/// - Relative: "3 days ago", "1 week ago"
pub fn parse_date(s: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let s = s.trim();
    let invalid = || ValidationError::InvalidDate {
        value: s.to_string(),
    };

    if CALENDAR_DATE_RE.is_match(s) {
        return NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| invalid());
    }

    match s {
        "today" => return Ok(today),
        "yesterday" => return Ok(today - Duration::days(1)),
        _ => {}
    }

    let caps = RELATIVE_DATE_RE.captures(s).ok_or_else(invalid)?;
    let n: i64 = caps[1].parse().map_err(|_| invalid())?;
    let days = match &caps[2] {
        "week" => n.checked_mul(7),
        _ => Some(n),
    }
    .filter(|days| *days <= MAX_RELATIVE_DAYS)
    .ok_or_else(invalid)?;

    today
        .checked_sub_signed(Duration::days(days))
        .ok_or_else(invalid)
}

/// Formats a UTC timestamp in local time.
pub fn format_local(t: DateTime<Utc>, format: &str) -> String {
    t.with_timezone(&Local).format(format).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    #[test]
    fn parses_calendar_dates() {
        assert_eq!(
            parse_date("2024-06-01", today()).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
    }

    #[test]
    fn parses_keywords() {
        assert_eq!(parse_date("today", today()).unwrap(), today());
        assert_eq!(
            parse_date("yesterday", today()).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 9).unwrap()
        );
    }

    #[test]
    fn parses_relative_dates() {
        assert_eq!(
            parse_date("3 days ago", today()).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 7).unwrap()
        );
        assert_eq!(
            parse_date("1 day ago", today()).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 9).unwrap()
        );
        assert_eq!(
            parse_date("2 weeks ago", today()).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 27).unwrap()
        );
    }

    #[test]
    fn rejects_malformed_dates() {
        for input in [
            "2024-13-01",
            "2024-02-30",
            "06/01/2024",
            "2024-6-3",
            "+12345-01-01",
            "soon",
            "",
            "3 months ago",
        ] {
            assert_eq!(
                parse_date(input, today()),
                Err(ValidationError::InvalidDate {
                    value: input.to_string()
                }),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_huge_relative_dates() {
        assert!(parse_date("999999999 weeks ago", today()).is_err());
        assert!(parse_date("99999999999999999999 days ago", today()).is_err());
    }
}
