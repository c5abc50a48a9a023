//! Recent-performance scoring.
//!
//! Average daily hours over a trailing window (today included) are compared
//! with a daily target and mapped to 0.0 (way behind) .. 1.0 (well ahead):
//!
//! | ratio        | score                 |
//! |--------------|-----------------------|
//! | >= 1.2       | 1.0                   |
//! | 1.0 .. 1.2   | 0.8 + (ratio - 1.0)   |
//! | 0.8 .. 1.0   | 0.6 + (ratio - 0.8)   |
//! | 0.5 .. 0.8   | 0.3 + (ratio - 0.5)   |
//! | < 0.5        | ratio * 0.6           |
//!
//! The curve is continuous at every breakpoint.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::entry::WorkRecord;
use crate::history::WorkHistory;
use crate::storage::PerformanceConfig;

/// Score when nothing was logged inside the window.
pub const NEUTRAL_PERFORMANCE: f64 = 0.5;

/// Map an average/target ratio to a 0-1 score.
pub fn ratio_to_score(ratio: f64) -> f64 {
    if ratio >= 1.2 {
        1.0
    } else if ratio >= 1.0 {
        0.8 + (ratio - 1.0)
    } else if ratio >= 0.8 {
        0.6 + (ratio - 0.8)
    } else if ratio >= 0.5 {
        0.3 + (ratio - 0.5)
    } else {
        ratio * 0.6
    }
}

/// Breakdown behind a performance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    /// Days in the window with logged work
    pub days_present: usize,
    /// `None` when no day in the window has work
    pub avg_daily_hours: Option<f64>,
    pub ratio: Option<f64>,
    pub score: f64,
}

/// Scores recent daily hours against a target.
#[derive(Debug, Clone)]
pub struct PerformanceScorer {
    config: PerformanceConfig,
}

impl Default for PerformanceScorer {
    fn default() -> Self {
        Self::new(PerformanceConfig::default())
    }
}

impl PerformanceScorer {
    pub fn new(config: PerformanceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PerformanceConfig {
        &self.config
    }

    /// First and last day of the window ending on `today`.
    pub fn window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let span = i64::from(self.config.window_days.max(1)) - 1;
        (today - Duration::days(span), today)
    }

    /// Full breakdown over aggregated history.
    pub fn snapshot(&self, history: &WorkHistory, today: NaiveDate) -> PerformanceSnapshot {
        let (window_start, window_end) = self.window(today);

        let (days_present, total) = history
            .days_between(window_start, window_end)
            .fold((0usize, 0.0), |(days, total), (_, hours)| (days + 1, total + hours));

        if days_present == 0 {
            return PerformanceSnapshot {
                window_start,
                window_end,
                days_present,
                avg_daily_hours: None,
                ratio: None,
                score: NEUTRAL_PERFORMANCE,
            };
        }

        let avg = total / days_present as f64;
        let ratio = avg / self.config.daily_target_hours;
        PerformanceSnapshot {
            window_start,
            window_end,
            days_present,
            avg_daily_hours: Some(avg),
            ratio: Some(ratio),
            score: ratio_to_score(ratio),
        }
    }

    /// Score over aggregated history.
    pub fn score_history(&self, history: &WorkHistory, today: NaiveDate) -> f64 {
        self.snapshot(history, today).score
    }

    /// Score over raw records.
    pub fn score(&self, records: &[WorkRecord], today: NaiveDate) -> f64 {
        self.score_history(&WorkHistory::from_records(records), today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn ratio_bands() {
        assert_eq!(ratio_to_score(2.0), 1.0);
        assert!(close(ratio_to_score(1.1), 0.9));
        assert!(close(ratio_to_score(0.9), 0.7));
        assert!(close(ratio_to_score(0.6), 0.4));
        assert!(close(ratio_to_score(0.25), 0.15));
        assert_eq!(ratio_to_score(0.0), 0.0);
    }

    #[test]
    fn continuous_at_breakpoints() {
        let eps = 1e-9;
        for bp in [0.5, 0.8, 1.0, 1.2] {
            let left = ratio_to_score(bp - eps);
            let right = ratio_to_score(bp);
            assert!((left - right).abs() < 1e-6, "discontinuity at {bp}: {left} vs {right}");
        }
    }

    #[test]
    fn empty_window_is_neutral() {
        let scorer = PerformanceScorer::default();
        assert_eq!(scorer.score(&[], d(16)), 0.5);

        // Work exists, but outside the 3-day window
        let records = vec![WorkRecord::new(d(10), "Coding", 8.0)];
        assert_eq!(scorer.score(&records, d(16)), 0.5);
    }

    #[test]
    fn averages_only_days_present() {
        let scorer = PerformanceScorer::default();
        // Window 14..=16; only the 14th and 16th have work
        let records = vec![
            WorkRecord::new(d(14), "Coding", 4.0),
            WorkRecord::new(d(16), "Coding", 3.0),
            WorkRecord::new(d(16), "Research", 1.0),
            WorkRecord::new(d(17), "Coding", 12.0), // after today, ignored
        ];
        let snapshot = scorer.snapshot(&WorkHistory::from_records(&records), d(16));
        assert_eq!(snapshot.days_present, 2);
        assert_eq!(snapshot.avg_daily_hours, Some(4.0));
        // ratio 4/6
        assert!(close(snapshot.score, 0.3 + (4.0 / 6.0 - 0.5)));
        assert_eq!(snapshot.window_start, d(14));
    }

    #[test]
    fn custom_target_and_window() {
        let scorer = PerformanceScorer::new(PerformanceConfig {
            daily_target_hours: 4.0,
            window_days: 1,
        });
        let records = vec![
            WorkRecord::new(d(15), "Coding", 1.0),
            WorkRecord::new(d(16), "Coding", 5.0),
        ];
        // only the 16th counts: ratio 1.25
        assert_eq!(scorer.score(&records, d(16)), 1.0);
    }
}
