//! Running aggregates over dated work records.
//!
//! Both scorers only need two views of history: hours per day, and hours
//! per (ISO week, category). Keeping those as running sums lets the feature
//! builder replay a long log without rescanning its prefix.

use chrono::{Datelike, Duration, NaiveDate};
use std::collections::{BTreeMap, HashMap};

use crate::entry::WorkRecord;

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Monday..=Sunday of the ISO week containing `date`.
pub fn week_range(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = week_start(date);
    (start, start + Duration::days(6))
}

/// Hours per day and per week/category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkHistory {
    daily: BTreeMap<NaiveDate, f64>,
    weekly: HashMap<(NaiveDate, String), f64>,
}

impl WorkHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<'r>(records: impl IntoIterator<Item = &'r WorkRecord>) -> Self {
        let mut history = Self::new();
        for record in records {
            history.add(record);
        }
        history
    }

    pub fn add(&mut self, record: &WorkRecord) {
        self.add_hours(record.date, &record.category, record.hours);
    }

    /// Fold hours into both aggregates. A day is "present" once anything
    /// was logged on it, even zero hours.
    pub fn add_hours(&mut self, date: NaiveDate, category: &str, hours: f64) {
        *self.daily.entry(date).or_insert(0.0) += hours;
        *self
            .weekly
            .entry((week_start(date), category.to_string()))
            .or_insert(0.0) += hours;
    }

    pub fn is_empty(&self) -> bool {
        self.daily.is_empty()
    }

    /// Days with logged work, oldest first.
    pub fn daily_hours(&self) -> &BTreeMap<NaiveDate, f64> {
        &self.daily
    }

    pub fn hours_on(&self, date: NaiveDate) -> f64 {
        self.daily.get(&date).copied().unwrap_or(0.0)
    }

    /// Days present within `first..=last`.
    pub fn days_between(&self, first: NaiveDate, last: NaiveDate) -> impl Iterator<Item = (&NaiveDate, &f64)> {
        self.daily.range(first..=last)
    }

    /// Hours logged against `category` in the ISO week containing `date`.
    pub fn category_hours_in_week(&self, date: NaiveDate, category: &str) -> f64 {
        self.weekly
            .get(&(week_start(date), category.to_string()))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn total_hours(&self) -> f64 {
        self.daily.values().sum()
    }
}
