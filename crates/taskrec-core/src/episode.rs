//! Episode inference from raw time-log rows.
//!
//! An episode is a contiguous burst of work on one task. Rows are folded
//! into episodes by a two-state machine:
//!
//! ```text
//!                 row                      row (same task, gap <= threshold)
//! NoOpenEpisode ──────> OpenEpisode ─────────────────────────┐
//!       ^                 │    ^                             │ extend
//!       │ end of stream   │    └─────────────────────────────┘
//!       └── (emit) ───────┘
//!                         │ row (other task or gap > threshold)
//!                         └──> emit current, open new
//! ```
//!
//! Each episode is labelled completed when its accumulated minutes reach
//! `completion_factor` of the estimate captured when it opened.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::TaskCatalog;
use crate::entry::{TimeEntry, WorkRecord};
use crate::error::SegmentError;
use crate::storage::SegmentationConfig;

/// A row the segmenter can consume.
pub trait SegmentRow {
    fn task_name(&self) -> &str;
    fn start(&self) -> DateTime<FixedOffset>;
    /// Seconds
    fn duration_secs(&self) -> i64;
}

impl SegmentRow for TimeEntry {
    fn task_name(&self) -> &str {
        TimeEntry::task_name(self)
    }

    fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    fn duration_secs(&self) -> i64 {
        self.duration
    }
}

/// A completed or abandoned stretch of work on a single task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub task_name: String,
    pub category: String,
    pub difficulty: u8,
    pub start: DateTime<FixedOffset>,
    /// Stop time of the last row folded in
    pub end: DateTime<FixedOffset>,
    pub cum_minutes: f64,
    pub est_minutes: f64,
    pub completed: bool,
    /// Number of log rows folded into this episode
    pub rows: usize,
}

impl Episode {
    /// Local date of the start.
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Local hour of the start.
    pub fn hour(&self) -> u32 {
        self.start.hour()
    }

    pub fn hours(&self) -> f64 {
        self.cum_minutes / 60.0
    }

    /// The episode as a dated work record.
    pub fn work_record(&self) -> WorkRecord {
        WorkRecord::new(self.date(), self.category.clone(), self.hours())
    }
}

/// Episode under construction.
#[derive(Debug)]
struct OpenEpisode {
    task_name: String,
    category: String,
    difficulty: u8,
    start: DateTime<FixedOffset>,
    last_stop: DateTime<FixedOffset>,
    cum_minutes: f64,
    est_minutes: f64,
    rows: usize,
}

impl OpenEpisode {
    fn close(self, completion_factor: f64) -> Episode {
        Episode {
            completed: self.cum_minutes >= completion_factor * self.est_minutes,
            task_name: self.task_name,
            category: self.category,
            difficulty: self.difficulty,
            start: self.start,
            end: self.last_stop,
            cum_minutes: self.cum_minutes,
            est_minutes: self.est_minutes,
            rows: self.rows,
        }
    }
}

#[derive(Debug)]
enum SegmenterState {
    NoOpenEpisode,
    OpenEpisode(OpenEpisode),
}

/// Folds sorted rows into episodes.
pub struct EpisodeSegmenter<'a> {
    config: SegmentationConfig,
    catalog: &'a TaskCatalog,
}

impl<'a> EpisodeSegmenter<'a> {
    pub fn new(config: SegmentationConfig, catalog: &'a TaskCatalog) -> Self {
        Self { config, catalog }
    }

    /// Check ordering and durations before anything is emitted.
    ///
    /// Returns the stop time of every row.
    fn validate<R: SegmentRow>(rows: &[R]) -> Result<Vec<DateTime<FixedOffset>>, SegmentError> {
        let mut previous: Option<DateTime<FixedOffset>> = None;
        let mut stops = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let duration_secs = row.duration_secs();
            if duration_secs < 0 {
                return Err(SegmentError::NegativeDuration {
                    index,
                    task_name: row.task_name().to_string(),
                    duration_secs,
                });
            }
            let stop = Duration::try_seconds(duration_secs)
                .and_then(|d| row.start().checked_add_signed(d))
                .ok_or_else(|| SegmentError::DurationOutOfRange {
                    index,
                    task_name: row.task_name().to_string(),
                    duration_secs,
                })?;
            if let Some(previous) = previous {
                if row.start() < previous {
                    return Err(SegmentError::Unsorted {
                        index,
                        start: row.start(),
                        previous,
                    });
                }
            }
            previous = Some(row.start());
            stops.push(stop);
        }
        Ok(stops)
    }

    fn open<R: SegmentRow>(&self, row: &R) -> OpenEpisode {
        let (category, difficulty, est_minutes) = match self.catalog.get(row.task_name()) {
            Some(task) => (task.category.clone(), task.difficulty, task.estimated_minutes()),
            None => (
                self.config.default_category.clone(),
                self.config.default_difficulty,
                self.config.default_estimated_minutes,
            ),
        };

        OpenEpisode {
            task_name: row.task_name().to_string(),
            category,
            difficulty,
            start: row.start(),
            last_stop: row.start(),
            cum_minutes: 0.0,
            est_minutes,
            rows: 0,
        }
    }

    fn starts_new_episode<R: SegmentRow>(&self, open: &OpenEpisode, row: &R) -> bool {
        // a threshold beyond the representable range never splits
        let gap_exceeded = Duration::try_minutes(self.config.gap_minutes)
            .is_some_and(|limit| row.start() - open.last_stop > limit);
        row.task_name() != open.task_name || gap_exceeded
    }

    /// Segment rows sorted by start time.
    ///
    /// # Errors
    /// Fails on the first row that starts before its predecessor or whose
    /// duration is negative or out of range; no episodes are produced in
    /// that case.
    pub fn segment<R: SegmentRow>(&self, rows: &[R]) -> Result<Vec<Episode>, SegmentError> {
        let stops = Self::validate(rows)?;

        let factor = self.config.completion_factor;
        let mut episodes = Vec::new();
        let mut state = SegmenterState::NoOpenEpisode;

        for (row, stop) in rows.iter().zip(stops) {
            let mut current = match state {
                SegmenterState::NoOpenEpisode => self.open(row),
                SegmenterState::OpenEpisode(open) => {
                    if self.starts_new_episode(&open, row) {
                        episodes.push(open.close(factor));
                        self.open(row)
                    } else {
                        open
                    }
                }
            };

            current.cum_minutes += row.duration_secs() as f64 / 60.0;
            current.last_stop = stop;
            current.rows += 1;
            state = SegmenterState::OpenEpisode(current);
        }

        if let SegmenterState::OpenEpisode(open) = state {
            episodes.push(open.close(factor));
        }

        debug!(
            rows = rows.len(),
            episodes = episodes.len(),
            completed = episodes.iter().filter(|e| e.completed).count(),
            "segmented time log"
        );
        Ok(episodes)
    }
}
