//! Point-in-time features for completion-model training.
//!
//! Episodes are replayed in chronological order. For episode `i`, the
//! performance score and category completion are computed over episodes
//! `0..=i` only, with "today" set to the local date the episode started.
//! No event can see work that happened after it.
//!
//! The replay keeps running daily and weekly/category sums, so the whole
//! pass is linear in the number of episodes. [`FeatureBuilder::build_from_scratch`]
//! recomputes every prefix independently and exists to check the
//! incremental path.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::GoalCatalog;
use crate::episode::Episode;
use crate::error::SegmentError;
use crate::goals::GoalProgressScorer;
use crate::history::WorkHistory;
use crate::model::CompletionFeatures;
use crate::performance::PerformanceScorer;
use crate::storage::PerformanceConfig;

/// One training row: an episode plus the context it started in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskEvent {
    pub task_name: String,
    pub category: String,
    pub difficulty: u8,
    pub started_at: DateTime<FixedOffset>,
    pub completed: bool,
    pub perf_score_at_start: f64,
    pub hour_of_day: u32,
    /// Weekly percentage / 100; capped at 1.0 because the percentage is
    pub category_completion: f64,
}

impl TaskEvent {
    pub fn features(&self) -> CompletionFeatures {
        CompletionFeatures {
            perf_score: self.perf_score_at_start,
            hour_of_day: self.hour_of_day,
            difficulty: self.difficulty,
            category_signal: self.category_completion,
        }
    }
}

/// Replays episodes into [`TaskEvent`]s.
pub struct FeatureBuilder<'a> {
    performance: PerformanceScorer,
    goals: GoalProgressScorer<'a>,
}

impl<'a> FeatureBuilder<'a> {
    pub fn new(performance: PerformanceConfig, goals: &'a GoalCatalog) -> Self {
        Self {
            performance: PerformanceScorer::new(performance),
            goals: GoalProgressScorer::new(goals),
        }
    }

    fn check_order(episodes: &[Episode]) -> Result<(), SegmentError> {
        for (index, pair) in episodes.windows(2).enumerate() {
            if pair[1].start < pair[0].start {
                return Err(SegmentError::Unsorted {
                    index: index + 1,
                    start: pair[1].start,
                    previous: pair[0].start,
                });
            }
        }
        Ok(())
    }

    fn event(&self, episode: &Episode, prefix: &WorkHistory) -> TaskEvent {
        let today = episode.date();
        let perf_score = self.performance.score_history(prefix, today);
        let category_completion = self
            .goals
            .category_progress(prefix, today, &episode.category)
            .map(|p| p.percentage / 100.0)
            .unwrap_or(0.0);

        TaskEvent {
            task_name: episode.task_name.clone(),
            category: episode.category.clone(),
            difficulty: episode.difficulty,
            started_at: episode.start,
            completed: episode.completed,
            perf_score_at_start: perf_score,
            hour_of_day: episode.hour(),
            category_completion,
        }
    }

    /// Build one event per episode using running aggregates.
    ///
    /// # Errors
    /// Episodes must be in chronological order.
    pub fn build(&self, episodes: &[Episode]) -> Result<Vec<TaskEvent>, SegmentError> {
        Self::check_order(episodes)?;

        let mut prefix = WorkHistory::new();
        let events: Vec<TaskEvent> = episodes
            .iter()
            .map(|episode| {
                prefix.add(&episode.work_record());
                self.event(episode, &prefix)
            })
            .collect();

        debug!(events = events.len(), "built task events");
        Ok(events)
    }

    /// Same result as [`FeatureBuilder::build`], recomputing each prefix
    /// from nothing. Quadratic.
    pub fn build_from_scratch(&self, episodes: &[Episode]) -> Result<Vec<TaskEvent>, SegmentError> {
        Self::check_order(episodes)?;

        Ok((0..episodes.len())
            .map(|i| {
                let records: Vec<_> = episodes[..=i].iter().map(Episode::work_record).collect();
                self.event(&episodes[i], &WorkHistory::from_records(&records))
            })
            .collect())
    }
}
