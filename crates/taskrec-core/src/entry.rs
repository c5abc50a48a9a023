//! Raw time-log entries and the dated work records derived from them.
//!
//! Timestamps carry their own UTC offset; the local date and hour used by
//! every scorer are read in that offset.

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

/// One row of the time log, as handed over by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: u64,
    pub start: DateTime<FixedOffset>,
    #[serde(default)]
    pub stop: Option<DateTime<FixedOffset>>,
    /// Seconds; negative while a timer is still running
    pub duration: i64,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TimeEntry {
    /// Task name the entry was logged under.
    pub fn task_name(&self) -> &str {
        self.description.trim()
    }

    /// Duration in hours.
    pub fn hours(&self) -> f64 {
        self.duration as f64 / 3600.0
    }

    /// Local calendar date of the start.
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Local hour of the start (0-23).
    pub fn hour(&self) -> u32 {
        self.start.hour()
    }
}

/// Sort entries by start time, keeping the log order for equal starts.
pub fn sort_entries(entries: &mut [TimeEntry]) {
    entries.sort_by_key(|e| e.start);
}

/// A dated, categorized amount of work.
///
/// This is the common currency of the performance and goal scorers: both
/// time entries and inferred episodes reduce to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkRecord {
    pub date: NaiveDate,
    pub category: String,
    pub hours: f64,
}

impl WorkRecord {
    pub fn new(date: NaiveDate, category: impl Into<String>, hours: f64) -> Self {
        Self {
            date,
            category: category.into(),
            hours,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(start: &str, duration: i64, description: &str) -> TimeEntry {
        TimeEntry {
            id: 1,
            start: DateTime::parse_from_rfc3339(start).unwrap(),
            stop: None,
            duration,
            project: None,
            description: description.to_string(),
            tags: vec![],
        }
    }

    #[test]
    fn local_date_and_hour_follow_offset() {
        // 20:00 UTC is 01:30 the next day at +05:30
        let e = entry("2025-07-14T01:30:00+05:30", 1800, "Read");
        assert_eq!(e.date(), NaiveDate::from_ymd_opt(2025, 7, 14).unwrap());
        assert_eq!(e.hour(), 1);
        assert_eq!(e.hours(), 0.5);
    }

    #[test]
    fn deserializes_minimal_json() {
        let json = r#"{"id": 7, "start": "2025-07-14T09:00:00+00:00", "duration": 600, "description": " Deep work "}"#;
        let e: TimeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(e.task_name(), "Deep work");
        assert!(e.project.is_none());
        assert!(e.tags.is_empty());
    }

    #[test]
    fn sort_is_stable() {
        let mut entries = vec![
            entry("2025-07-14T10:00:00+00:00", 60, "b"),
            entry("2025-07-14T09:00:00+00:00", 60, "a"),
            entry("2025-07-14T10:00:00+00:00", 60, "c"),
        ];
        sort_entries(&mut entries);
        let names: Vec<_> = entries.iter().map(|e| e.task_name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
