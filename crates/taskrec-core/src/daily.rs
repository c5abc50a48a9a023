//! Daily hours against the daily target.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::history::WorkHistory;

/// Rolling-average status against the daily target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyStatus {
    OnTrack,
    SlightlyBehind,
    SignificantlyBehind,
}

impl DailyStatus {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 1.0 {
            DailyStatus::OnTrack
        } else if ratio >= 0.8 {
            DailyStatus::SlightlyBehind
        } else {
            DailyStatus::SignificantlyBehind
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DailyStatus::OnTrack => "On track!",
            DailyStatus::SlightlyBehind => "Slightly behind",
            DailyStatus::SignificantlyBehind => "Significantly behind",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    pub daily_hours: BTreeMap<NaiveDate, f64>,
    /// Mean over the window days before today; days without work count as 0
    pub rolling_average: f64,
    pub target_hours: f64,
    pub performance_ratio: f64,
    /// Most recent first
    pub recent_days: Vec<(NaiveDate, f64)>,
    pub status: DailyStatus,
}

#[derive(Debug, Clone)]
pub struct DailyTracker {
    target_hours: f64,
    window_days: u32,
}

impl DailyTracker {
    pub fn new(target_hours: f64, window_days: u32) -> Self {
        Self {
            target_hours,
            window_days,
        }
    }

    /// Stats as of `today`. Today itself is not part of the window.
    pub fn stats(&self, history: &WorkHistory, today: NaiveDate) -> DailyStats {
        let recent_days: Vec<(NaiveDate, f64)> = (1..=i64::from(self.window_days))
            .map(|i| {
                let day = today - Duration::days(i);
                (day, history.hours_on(day))
            })
            .collect();

        let rolling_average = if recent_days.is_empty() {
            0.0
        } else {
            recent_days.iter().map(|(_, h)| h).sum::<f64>() / recent_days.len() as f64
        };
        let performance_ratio = rolling_average / self.target_hours;

        DailyStats {
            daily_hours: history.daily_hours().clone(),
            rolling_average,
            target_hours: self.target_hours,
            performance_ratio,
            recent_days,
            status: DailyStatus::from_ratio(performance_ratio),
        }
    }
}
