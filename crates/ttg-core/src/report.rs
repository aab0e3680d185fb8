//! Report aggregation over the history log.
//!
//! A report selects completed entries whose end time falls inside a window of
//! local calendar days, applies project include/ignore lists, and sums the
//! durations per project.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::entry::TimeEntry;
use crate::types::ValidationError;

/// Window length used when a bound is missing.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

// ========== Date Window ==========

/// Converts a local date at midnight to UTC.
/// Handles DST ambiguity by picking the earlier time.
pub fn local_midnight_to_utc(local_date: NaiveDate) -> DateTime<Utc> {
    let midnight = local_date.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight) {
        // Single or ambiguous (DST fall-back): use the earlier time
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => {
            // DST spring-forward gap at midnight is rare but possible.
            // Fall back to 1am local, then to the naive time read as UTC.
            let one_am = local_date.and_time(NaiveTime::MIN) + Duration::hours(1);
            Local
                .from_local_datetime(&one_am)
                .earliest()
                .map_or_else(|| midnight.and_utc(), |dt| dt.with_timezone(&Utc))
        }
    }
}

/// Inclusive range of local calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ReportWindow {
    /// Resolves optional bounds against `today`.
    ///
    /// With no bounds the window is the last week up to today. With one
    /// bound the other is placed seven days away from it. Bounds at the edge
    /// of the calendar range are rejected as invalid dates.
    pub fn resolve(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let span = Duration::days(DEFAULT_WINDOW_DAYS);
        let shift = |date: NaiveDate, delta: Duration| {
            date.checked_add_signed(delta)
                .ok_or_else(|| ValidationError::InvalidDate {
                    value: date.to_string(),
                })
        };
        let (from, to) = match (from, to) {
            (Some(from), Some(to)) => (from, to),
            (Some(from), None) => (from, shift(from, span)?),
            (None, Some(to)) => (shift(to, -span)?, to),
            (None, None) => (shift(today, -span)?, today),
        };

        if from > to {
            return Err(ValidationError::InvalidWindow { from, to });
        }
        // The window ends at midnight after `to`, which must exist.
        if to.succ_opt().is_none() {
            return Err(ValidationError::InvalidDate {
                value: to.to_string(),
            });
        }
        Ok(Self { from, to })
    }

    /// Half-open UTC bounds: midnight of `from` up to midnight after `to`.
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = local_midnight_to_utc(self.from);
        let end = self
            .to
            .succ_opt()
            .map_or(DateTime::<Utc>::MAX_UTC, local_midnight_to_utc);
        (start, end)
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        let (start, end) = self.bounds();
        t >= start && t < end
    }
}

// ========== Project Filter ==========

/// Project include/ignore lists.
///
/// A non-empty include list keeps only the listed projects. The ignore list
/// always wins, so a project named in both is excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub include: Vec<String>,
    pub ignore: Vec<String>,
}

impl ProjectFilter {
    pub const fn new(include: Vec<String>, ignore: Vec<String>) -> Self {
        Self { include, ignore }
    }

    pub fn allows(&self, project: &str) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|p| p == project);
        included && !self.ignore.iter().any(|p| p == project)
    }

    /// Every project named by the filter, include list first.
    pub fn named_projects(&self) -> impl Iterator<Item = &str> {
        self.include.iter().chain(&self.ignore).map(String::as_str)
    }
}

// ========== Aggregation ==========

/// Totals and detail for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectReport {
    pub total: Duration,
    pub entries: Vec<TimeEntry>,
}

impl Default for ProjectReport {
    fn default() -> Self {
        Self {
            total: Duration::zero(),
            entries: Vec::new(),
        }
    }
}

/// Aggregated report, keyed and ordered by project name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub window: ReportWindow,
    pub projects: BTreeMap<String, ProjectReport>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Sum over all projects.
    pub fn total(&self) -> Duration {
        self.projects
            .values()
            .fold(Duration::zero(), |acc, p| acc + p.total)
    }

    /// Entry count over all projects.
    pub fn entry_count(&self) -> usize {
        self.projects.values().map(|p| p.entries.len()).sum()
    }
}

/// Builds a report from the history log.
///
/// Entries are kept when their end time lies in the window and their project
/// passes the filter. Entries keep their history order within a project.
pub fn aggregate(history: &[TimeEntry], window: ReportWindow, filter: &ProjectFilter) -> Report {
    let (start, end) = window.bounds();
    let mut projects: BTreeMap<String, ProjectReport> = BTreeMap::new();

    for entry in history {
        let Some(end_time) = entry.end_time else {
            tracing::warn!(
                project = %entry.project,
                start = %entry.start_time,
                "skipping history entry without end time"
            );
            continue;
        };
        if end_time < start || end_time >= end || !filter.allows(&entry.project) {
            continue;
        }

        let project = projects.entry(entry.project.clone()).or_default();
        project.total += end_time - entry.start_time;
        project.entries.push(entry.clone());
    }

    tracing::debug!(%start, %end, projects = projects.len(), "aggregated report");
    Report { window, projects }
}

// ========== Duration Formatting ==========

/// Formats a duration as `1h01m01s`, `1m05s` or `5s`.
///
/// The leading unit is not padded; the following units are two digits.
/// Negative durations are rendered as `0s`.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds / 60) % 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}h{minutes:02}m{seconds:02}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// A completed entry ending at `hour`:00 local time on `day`, lasting `minutes`.
    fn entry_ending(project: &str, day: NaiveDate, hour: i64, minutes: i64) -> TimeEntry {
        let end = local_midnight_to_utc(day) + Duration::hours(hour);
        TimeEntry::completed(project, end - Duration::minutes(minutes), end)
    }

    fn window(from: NaiveDate, to: NaiveDate) -> ReportWindow {
        ReportWindow::resolve(Some(from), Some(to), to).unwrap()
    }

    // ========== Window Tests ==========

    #[test]
    fn default_window_is_last_week() {
        let today = date(2024, 6, 10);
        let window = ReportWindow::resolve(None, None, today).unwrap();
        assert_eq!(window.from, date(2024, 6, 3));
        assert_eq!(window.to, today);
    }

    #[test]
    fn only_from_extends_forward() {
        let window =
            ReportWindow::resolve(Some(date(2024, 6, 1)), None, date(2024, 12, 1)).unwrap();
        assert_eq!(window.to, date(2024, 6, 8));
    }

    #[test]
    fn only_to_extends_backward() {
        let window =
            ReportWindow::resolve(None, Some(date(2024, 6, 8)), date(2024, 12, 1)).unwrap();
        assert_eq!(window.from, date(2024, 6, 1));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let err =
            ReportWindow::resolve(Some(date(2024, 6, 9)), Some(date(2024, 6, 8)), date(2024, 6, 9))
                .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidWindow { .. }));
    }

    #[test]
    fn window_at_calendar_edge_is_rejected() {
        let today = date(2024, 6, 10);
        let near_max = NaiveDate::MAX - Duration::days(1);
        let invalid = |value: NaiveDate| ValidationError::InvalidDate {
            value: value.to_string(),
        };

        assert_eq!(
            ReportWindow::resolve(Some(near_max), None, today),
            Err(invalid(near_max))
        );
        assert_eq!(
            ReportWindow::resolve(Some(today), Some(NaiveDate::MAX), today),
            Err(invalid(NaiveDate::MAX))
        );
        assert_eq!(
            ReportWindow::resolve(None, Some(NaiveDate::MIN), today),
            Err(invalid(NaiveDate::MIN))
        );
        assert!(ReportWindow::resolve(Some(near_max), Some(near_max), today).is_ok());
    }

    #[test]
    fn window_covers_full_last_day() {
        let window = window(date(2024, 6, 3), date(2024, 6, 3));
        let (start, end) = window.bounds();

        assert_eq!(start.with_timezone(&Local).date_naive(), date(2024, 6, 3));
        assert_eq!(end.with_timezone(&Local).date_naive(), date(2024, 6, 4));
        assert!(window.contains(start));
        assert!(window.contains(end - Duration::seconds(1)));
        assert!(!window.contains(end));
        assert!(!window.contains(start - Duration::seconds(1)));
    }

    // ========== Filter Tests ==========

    #[test]
    fn empty_filter_allows_everything() {
        let filter = ProjectFilter::default();
        assert!(filter.allows("work"));
        assert!(filter.allows("other"));
    }

    #[test]
    fn include_list_restricts() {
        let filter = ProjectFilter::new(vec!["work".to_string()], vec![]);
        assert!(filter.allows("work"));
        assert!(!filter.allows("study"));
    }

    #[test]
    fn ignore_wins_over_include() {
        let filter = ProjectFilter::new(vec!["work".to_string()], vec!["work".to_string()]);
        assert!(!filter.allows("work"));
        assert!(!filter.allows("study"));
    }

    #[test]
    fn ignore_list_subtracts() {
        let filter = ProjectFilter::new(vec![], vec!["study".to_string()]);
        assert!(filter.allows("work"));
        assert!(!filter.allows("study"));
    }

    // ========== Aggregation Tests ==========

    #[test]
    fn single_day_report_includes_only_that_day() {
        let day = date(2024, 6, 3);
        let history = vec![
            entry_ending("work", day - Duration::days(1), 23, 30),
            entry_ending("work", day, 1, 60),
            entry_ending("work", day, 23, 15),
            entry_ending("work", day + Duration::days(1), 0, 10),
        ];

        let report = aggregate(&history, window(day, day), &ProjectFilter::default());

        assert_eq!(report.entry_count(), 2);
        assert_eq!(report.projects["work"].total, Duration::minutes(75));
        assert_eq!(report.projects["work"].entries, history[1..3]);
    }

    #[test]
    fn entry_starting_before_window_counts_by_end_time() {
        let day = date(2024, 6, 3);
        let end = local_midnight_to_utc(day) + Duration::hours(1);
        let history = vec![TimeEntry::completed("work", end - Duration::hours(3), end)];

        let report = aggregate(&history, window(day, day), &ProjectFilter::default());

        assert_eq!(report.projects["work"].total, Duration::hours(3));
    }

    #[test]
    fn sums_per_project_in_name_order() {
        let day = date(2024, 6, 3);
        let history = vec![
            entry_ending("work", day, 10, 90),
            entry_ending("study", day, 12, 30),
            entry_ending("work", day, 15, 15),
        ];

        let report = aggregate(&history, window(day, day), &ProjectFilter::default());

        let names: Vec<_> = report.projects.keys().map(String::as_str).collect();
        assert_eq!(names, ["study", "work"]);
        assert_eq!(report.projects["work"].total, Duration::minutes(105));
        assert_eq!(report.projects["study"].total, Duration::minutes(30));
        assert_eq!(report.total(), Duration::minutes(135));
    }

    #[test]
    fn filter_applies_to_aggregation() {
        let day = date(2024, 6, 3);
        let history = vec![
            entry_ending("work", day, 10, 90),
            entry_ending("study", day, 12, 30),
        ];
        let filter = ProjectFilter::new(vec![], vec!["work".to_string()]);

        let report = aggregate(&history, window(day, day), &filter);

        assert!(!report.projects.contains_key("work"));
        assert_eq!(report.entry_count(), 1);
    }

    #[test]
    fn running_entries_in_history_are_skipped() {
        let day = date(2024, 6, 3);
        let history = vec![TimeEntry::new("work", local_midnight_to_utc(day))];

        let report = aggregate(&history, window(day, day), &ProjectFilter::default());

        assert!(report.is_empty());
        assert_eq!(report.total(), Duration::zero());
    }

    // ========== Duration Formatting Tests ==========

    #[test]
    fn format_duration_seconds_only() {
        assert_eq!(format_duration(Duration::zero()), "0s");
        assert_eq!(format_duration(Duration::seconds(59)), "59s");
    }

    #[test]
    fn format_duration_minutes() {
        assert_eq!(format_duration(Duration::seconds(65)), "1m05s");
        assert_eq!(format_duration(Duration::minutes(45)), "45m00s");
    }

    #[test]
    fn format_duration_hours() {
        assert_eq!(format_duration(Duration::seconds(3661)), "1h01m01s");
        assert_eq!(format_duration(Duration::minutes(90)), "1h30m00s");
        assert_eq!(format_duration(Duration::hours(26)), "26h00m00s");
    }

    #[test]
    fn format_duration_truncates_subseconds() {
        assert_eq!(format_duration(Duration::milliseconds(65_999)), "1m05s");
    }

    #[test]
    fn format_duration_negative_is_zero() {
        assert_eq!(format_duration(Duration::seconds(-30)), "0s");
    }
}
