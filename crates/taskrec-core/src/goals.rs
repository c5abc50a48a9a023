//! Weekly goal progress and goal-driven urgency scores.
//!
//! Progress is measured over the ISO week (Monday-Sunday, local date)
//! containing "today". The goal score is an urgency signal: the further a
//! category is from its target, the higher it scores.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::{GoalCatalog, GoalPriority};
use crate::entry::WorkRecord;
use crate::history::{week_range, WorkHistory};

/// Where a category stands against its weekly target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// ratio >= 1.0
    Complete,
    /// ratio >= 0.7
    InProgress,
    Behind,
}

impl GoalStatus {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 1.0 {
            GoalStatus::Complete
        } else if ratio >= 0.7 {
            GoalStatus::InProgress
        } else {
            GoalStatus::Behind
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GoalStatus::Complete => "Complete",
            GoalStatus::InProgress => "In Progress",
            GoalStatus::Behind => "Behind",
        }
    }
}

/// Progress of one goal category this week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProgress {
    pub category: String,
    pub completed_hours: f64,
    pub target_hours: f64,
    /// Capped at 100
    pub percentage: f64,
    pub priority: GoalPriority,
    pub status: GoalStatus,
}

impl CategoryProgress {
    /// Uncapped completed/target ratio.
    pub fn ratio(&self) -> f64 {
        self.completed_hours / self.target_hours
    }
}

/// Base urgency for a completion ratio, before the priority multiplier.
pub fn base_goal_score(ratio: f64) -> f64 {
    if ratio >= 1.0 {
        0.2
    } else if ratio >= 0.8 {
        0.4
    } else if ratio >= 0.5 {
        0.8
    } else {
        1.0
    }
}

/// Priority-weighted urgency, capped at 1.0.
pub fn goal_score(ratio: f64, priority: GoalPriority) -> f64 {
    (base_goal_score(ratio) * priority.multiplier()).min(1.0)
}

/// Computes weekly progress against a goal catalog.
#[derive(Debug, Clone, Copy)]
pub struct GoalProgressScorer<'a> {
    goals: &'a GoalCatalog,
}

impl<'a> GoalProgressScorer<'a> {
    pub fn new(goals: &'a GoalCatalog) -> Self {
        Self { goals }
    }

    /// Progress for one category, or `None` when it has no usable goal.
    pub fn category_progress(
        &self,
        history: &WorkHistory,
        today: NaiveDate,
        category: &str,
    ) -> Option<CategoryProgress> {
        let goal = self.goals.get(category)?;
        let target = goal.usable_target()?;
        let completed = history.category_hours_in_week(today, category);
        let ratio = completed / target;

        Some(CategoryProgress {
            category: goal.category.clone(),
            completed_hours: completed,
            target_hours: target,
            percentage: (ratio * 100.0).min(100.0),
            priority: goal.priority,
            status: GoalStatus::from_ratio(ratio),
        })
    }

    /// Progress for every goal with a positive target, in catalog order.
    ///
    /// Goals with a zero or missing target are skipped.
    pub fn weekly_progress(
        &self,
        history: &WorkHistory,
        today: NaiveDate,
    ) -> IndexMap<String, CategoryProgress> {
        let mut progress = IndexMap::new();
        for goal in self.goals.all() {
            if goal.usable_target().is_none() {
                warn!(category = %goal.category, target = ?goal.target_hours, "skipping goal without a positive target");
                continue;
            }
            if let Some(p) = self.category_progress(history, today, &goal.category) {
                progress.insert(goal.category.clone(), p);
            }
        }
        progress
    }

    /// [`GoalProgressScorer::weekly_progress`] over raw records.
    pub fn weekly_progress_from_records(
        &self,
        records: &[WorkRecord],
        today: NaiveDate,
    ) -> IndexMap<String, CategoryProgress> {
        let (start, end) = week_range(today);
        let week: Vec<&WorkRecord> = records
            .iter()
            .filter(|r| r.date >= start && r.date <= end)
            .collect();
        self.weekly_progress(&WorkHistory::from_records(week), today)
    }

    /// Urgency score per tracked category.
    ///
    /// Categories without a goal are absent; callers fall back to a neutral
    /// score for them.
    pub fn calculate_weekly_goal_score(
        progress: &IndexMap<String, CategoryProgress>,
    ) -> IndexMap<String, f64> {
        progress
            .iter()
            .map(|(category, p)| (category.clone(), goal_score(p.ratio(), p.priority)))
            .collect()
    }

    /// Progress then scores, in one call.
    pub fn goal_scores(&self, history: &WorkHistory, today: NaiveDate) -> IndexMap<String, f64> {
        Self::calculate_weekly_goal_score(&self.weekly_progress(history, today))
    }
}
