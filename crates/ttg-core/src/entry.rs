//! Tracked time intervals.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single tracked interval for a project.
///
/// While the interval is running `end_time` is `None`. Once stopped and
/// archived to history it is never modified again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// The project this interval is booked against.
    pub project: String,
    /// When tracking started.
    pub start_time: DateTime<Utc>,
    /// When tracking stopped, if it has.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_end_time"
    )]
    pub end_time: Option<DateTime<Utc>>,
}

impl TimeEntry {
    /// Creates a running entry.
    pub fn new(project: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        Self {
            project: project.into(),
            start_time,
            end_time: None,
        }
    }

    /// Creates a completed entry.
    pub fn completed(
        project: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            project: project.into(),
            start_time,
            end_time: Some(end_time),
        }
    }

    /// Returns true while the entry has no end time.
    pub const fn is_running(&self) -> bool {
        self.end_time.is_none()
    }

    /// Length of a completed entry, `None` while running.
    pub fn duration(&self) -> Option<Duration> {
        self.end_time.map(|end| end - self.start_time)
    }

    /// Time elapsed since the start, measured at `now`. Never negative.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        (now - self.start_time).max(Duration::zero())
    }
}

/// Reads `end_time`, treating the zero timestamp `0001-01-01T00:00:00Z` as unset.
///
/// Files written by earlier versions of the tool carry that value for
/// entries that were still running.
fn deserialize_end_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<DateTime<Utc>>::deserialize(deserializer)?;
    Ok(value.filter(|t| !is_zero_timestamp(*t)))
}

fn is_zero_timestamp(t: DateTime<Utc>) -> bool {
    use chrono::{Datelike, Timelike};
    t.year() == 1 && t.ordinal() == 1 && t.num_seconds_from_midnight() == 0 && t.nanosecond() == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn entry_serialization_roundtrip() {
        let start = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 3, 10, 30, 0).unwrap();
        let entry = TimeEntry::completed("work", start, end);

        let json = serde_json::to_string(&entry).unwrap();
        let parsed: TimeEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.project, entry.project);
        assert_eq!(parsed.start_time, entry.start_time);
        assert_eq!(parsed.end_time, entry.end_time);
    }

    #[test]
    fn running_entry_omits_end_time() {
        let start = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
        let entry = TimeEntry::new("work", start);

        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"project":"work","start_time":"2024-06-03T09:00:00Z"}"#);
    }

    #[test]
    fn zero_end_time_reads_as_running() {
        let json = r#"{
            "project": "study",
            "start_time": "2024-06-03T09:00:00.123456+02:00",
            "end_time": "0001-01-01T00:00:00Z"
        }"#;
        let entry: TimeEntry = serde_json::from_str(json).unwrap();

        assert!(entry.is_running());
        assert_eq!(
            entry.start_time,
            Utc.with_ymd_and_hms(2024, 6, 3, 7, 0, 0).unwrap() + Duration::microseconds(123_456)
        );
    }

    #[test]
    fn null_end_time_reads_as_running() {
        let json = r#"{"project":"study","start_time":"2024-06-03T09:00:00Z","end_time":null}"#;
        let entry: TimeEntry = serde_json::from_str(json).unwrap();
        assert!(entry.is_running());
    }

    #[test]
    fn duration_of_completed_entry() {
        let start = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
        let entry = TimeEntry::completed("work", start, start + Duration::minutes(90));
        assert_eq!(entry.duration(), Some(Duration::minutes(90)));
        assert_eq!(TimeEntry::new("work", start).duration(), None);
    }

    #[test]
    fn elapsed_is_never_negative() {
        let start = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
        let entry = TimeEntry::new("work", start);
        assert_eq!(entry.elapsed(start - Duration::hours(1)), Duration::zero());
        assert_eq!(entry.elapsed(start + Duration::seconds(65)), Duration::seconds(65));
    }
}
