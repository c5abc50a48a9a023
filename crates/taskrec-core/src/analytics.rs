//! Summary figures over a raw time log.
//!
//! Running timers (negative duration) are left out of every total, the same
//! way the scorers skip them.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entry::TimeEntry;

/// Label for entries without a project.
pub const NO_PROJECT: &str = "(no project)";

fn finished(entries: &[TimeEntry]) -> impl Iterator<Item = &TimeEntry> {
    entries.iter().filter(|e| e.duration >= 0)
}

/// Total hours, rounded to 2 decimals.
pub fn total_hours(entries: &[TimeEntry]) -> f64 {
    let total: f64 = finished(entries).map(TimeEntry::hours).sum();
    (total * 100.0).round() / 100.0
}

/// Hours per local start date.
pub fn hours_per_day(entries: &[TimeEntry]) -> BTreeMap<NaiveDate, f64> {
    let mut days = BTreeMap::new();
    for entry in finished(entries) {
        *days.entry(entry.date()).or_insert(0.0) += entry.hours();
    }
    days
}

/// Trailing mean over up to `window` logged days, one point per day.
pub fn rolling_average(daily: &BTreeMap<NaiveDate, f64>, window: usize) -> Vec<(NaiveDate, f64)> {
    let hours: Vec<f64> = daily.values().copied().collect();
    daily
        .keys()
        .enumerate()
        .map(|(i, date)| {
            let from = (i + 1).saturating_sub(window.max(1));
            let slice = &hours[from..=i];
            (*date, slice.iter().sum::<f64>() / slice.len() as f64)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectHours {
    pub project: String,
    pub hours: f64,
}

/// Hours per project, largest first. Equal totals keep first-seen order.
pub fn hours_by_project(entries: &[TimeEntry]) -> Vec<ProjectHours> {
    let mut totals: IndexMap<&str, f64> = IndexMap::new();
    for entry in finished(entries) {
        let project = entry.project.as_deref().unwrap_or(NO_PROJECT);
        *totals.entry(project).or_insert(0.0) += entry.hours();
    }

    let mut projects: Vec<ProjectHours> = totals
        .into_iter()
        .map(|(project, hours)| ProjectHours {
            project: project.to_string(),
            hours,
        })
        .collect();
    projects.sort_by(|a, b| b.hours.total_cmp(&a.hours));
    projects
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayHours {
    pub date: NaiveDate,
    pub hours: f64,
    /// Trailing mean over the logged days up to this one
    pub rolling_average: f64,
}

/// Everything above for one log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSummary {
    pub total_hours: f64,
    /// Entries left out because their timer is still running
    pub running_timers: usize,
    pub days: Vec<DayHours>,
    pub projects: Vec<ProjectHours>,
}

impl LogSummary {
    pub fn from_entries(entries: &[TimeEntry], window: usize) -> Self {
        let daily = hours_per_day(entries);
        let days = rolling_average(&daily, window)
            .into_iter()
            .map(|(date, rolling_average)| DayHours {
                date,
                hours: daily.get(&date).copied().unwrap_or(0.0),
                rolling_average,
            })
            .collect();

        Self {
            total_hours: total_hours(entries),
            running_timers: entries.len() - finished(entries).count(),
            days,
            projects: hours_by_project(entries),
        }
    }
}
