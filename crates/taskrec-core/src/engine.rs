//! Recommendation engine facade.
//!
//! Bundles the configuration with the three catalogs and wires the scorers
//! together for callers that start from a raw time log. "Now" is always an
//! argument; nothing here reads the clock.

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike};
use indexmap::IndexMap;
use tracing::debug;

use crate::analytics::LogSummary;
use crate::catalog::{GoalCatalog, TaskCatalog};
use crate::category::CategoryResolver;
use crate::daily::{DailyStats, DailyTracker};
use crate::entry::{sort_entries, TimeEntry, WorkRecord};
use crate::episode::{Episode, EpisodeSegmenter};
use crate::error::{ConfigError, CoreError, SegmentError};
use crate::features::{FeatureBuilder, TaskEvent};
use crate::goals::{CategoryProgress, GoalProgressScorer};
use crate::history::WorkHistory;
use crate::model::CompletionModel;
use crate::performance::{PerformanceScorer, PerformanceSnapshot};
use crate::ranker::{PriorityRanker, RankingWeights, Recommendation};
use crate::storage::{self, EngineConfig};

pub struct RecommendationEngine {
    config: EngineConfig,
    tasks: TaskCatalog,
    goals: GoalCatalog,
    resolver: CategoryResolver,
    ranker: PriorityRanker,
}

impl RecommendationEngine {
    pub fn new(
        config: EngineConfig,
        tasks: TaskCatalog,
        goals: GoalCatalog,
        resolver: CategoryResolver,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let ranker = PriorityRanker::new(RankingWeights::from_config(&config.ranking)?);
        Ok(Self {
            config,
            tasks,
            goals,
            resolver,
            ranker,
        })
    }

    /// Load config and catalogs from the data directory. Missing catalog
    /// files start empty.
    pub fn load() -> Result<Self, CoreError> {
        let config = EngineConfig::load()?;
        let tasks = TaskCatalog::load_or_empty(&storage::data_file(storage::TASKS_FILE)?)?;
        let goals = GoalCatalog::load_or_empty(&storage::data_file(storage::GOALS_FILE)?)?;
        let resolver =
            CategoryResolver::load_or_default(&storage::data_file(storage::CATEGORY_MAPPING_FILE)?)?;
        Ok(Self::new(config, tasks, goals, resolver)?)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tasks(&self) -> &TaskCatalog {
        &self.tasks
    }

    pub fn goals(&self) -> &GoalCatalog {
        &self.goals
    }

    pub fn resolver(&self) -> &CategoryResolver {
        &self.resolver
    }

    /// Categorized, dated hours. Running timers (negative duration) are
    /// skipped.
    pub fn work_records(&self, entries: &[TimeEntry]) -> Vec<WorkRecord> {
        entries
            .iter()
            .filter(|e| e.duration >= 0)
            .map(|e| WorkRecord::new(e.date(), self.resolver.resolve_entry(e), e.hours()))
            .collect()
    }

    fn history(&self, entries: &[TimeEntry]) -> WorkHistory {
        WorkHistory::from_records(&self.work_records(entries))
    }

    fn performance_scorer(&self) -> PerformanceScorer {
        PerformanceScorer::new(self.config.performance.clone())
    }

    pub fn performance_snapshot(&self, entries: &[TimeEntry], today: NaiveDate) -> PerformanceSnapshot {
        self.performance_scorer().snapshot(&self.history(entries), today)
    }

    pub fn performance_score(&self, entries: &[TimeEntry], today: NaiveDate) -> f64 {
        self.performance_scorer().score_history(&self.history(entries), today)
    }

    /// Progress per tracked goal, high priority first.
    pub fn weekly_progress(
        &self,
        entries: &[TimeEntry],
        today: NaiveDate,
    ) -> IndexMap<String, CategoryProgress> {
        let mut progress =
            GoalProgressScorer::new(&self.goals).weekly_progress(&self.history(entries), today);
        self.goals
            .priority_categories()
            .into_iter()
            .filter_map(|category| progress.swap_remove_entry(category))
            .collect()
    }

    pub fn goal_scores(&self, entries: &[TimeEntry], today: NaiveDate) -> IndexMap<String, f64> {
        GoalProgressScorer::new(&self.goals).goal_scores(&self.history(entries), today)
    }

    /// Every catalog task, ranked as of `now`.
    pub fn recommendations(
        &self,
        entries: &[TimeEntry],
        now: DateTime<FixedOffset>,
        model: Option<&dyn CompletionModel>,
    ) -> Vec<Recommendation> {
        let today = now.date_naive();
        let history = self.history(entries);
        let perf_score = self.performance_scorer().score_history(&history, today);
        let goal_scores = GoalProgressScorer::new(&self.goals).goal_scores(&history, today);
        debug!(%today, perf_score, goals = goal_scores.len(), "scoring recommendations");

        self.ranker
            .rank(perf_score, &goal_scores, &self.tasks, model, now.hour())
    }

    /// The best `limit` tasks; `None` uses `ranking.top_n`.
    pub fn top_recommendations(
        &self,
        entries: &[TimeEntry],
        now: DateTime<FixedOffset>,
        model: Option<&dyn CompletionModel>,
        limit: Option<usize>,
    ) -> Vec<Recommendation> {
        let mut ranked = self.recommendations(entries, now, model);
        ranked.truncate(limit.unwrap_or(self.config.ranking.top_n));
        ranked
    }

    /// Episodes from an unsorted log.
    ///
    /// # Errors
    /// Fails on entries with a negative or out-of-range duration.
    pub fn episodes(&self, entries: &[TimeEntry]) -> Result<Vec<Episode>, SegmentError> {
        let mut sorted = entries.to_vec();
        sort_entries(&mut sorted);
        EpisodeSegmenter::new(self.config.segmentation.clone(), &self.tasks).segment(&sorted)
    }

    /// Training events from an unsorted log.
    pub fn task_events(&self, entries: &[TimeEntry]) -> Result<Vec<TaskEvent>, SegmentError> {
        let episodes = self.episodes(entries)?;
        FeatureBuilder::new(self.config.performance.clone(), &self.goals).build(&episodes)
    }

    pub fn daily_stats(&self, entries: &[TimeEntry], today: NaiveDate) -> DailyStats {
        DailyTracker::new(
            self.config.performance.daily_target_hours,
            self.config.daily.rolling_window_days,
        )
        .stats(&self.history(entries), today)
    }

    /// Totals per day and project, averaged over `daily.rolling_window_days`.
    pub fn summary(&self, entries: &[TimeEntry]) -> LogSummary {
        LogSummary::from_entries(entries, self.config.daily.rolling_window_days as usize)
    }

    /// Logged descriptions the resolver only places in its default category.
    pub fn unmapped_descriptions(&self, entries: &[TimeEntry]) -> Vec<String> {
        self.resolver.unmapped_descriptions(entries)
    }

    /// Set and normalize the ranking weights.
    pub fn update_weights(&mut self, performance: f64, goal: f64) -> Result<(), ConfigError> {
        self.ranker.update_weights(performance, goal)?;
        let weights = self.ranker.weights();
        self.config.ranking.performance_weight = weights.performance();
        self.config.ranking.goal_weight = weights.goal();
        Ok(())
    }

    pub fn set_daily_target(&mut self, hours: f64) -> Result<(), ConfigError> {
        if !(hours > 0.0 && hours.is_finite()) {
            return Err(ConfigError::InvalidValue {
                key: "performance.daily_target_hours".to_string(),
                message: format!("{hours} is not a positive number of hours"),
            });
        }
        self.config.performance.daily_target_hours = hours;
        Ok(())
    }
}
