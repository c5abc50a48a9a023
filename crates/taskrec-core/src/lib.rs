//! # taskrec Core Library
//!
//! This library turns a personal time-tracking log into ranked task
//! recommendations. All operations are available through the standalone
//! `taskrec-cli` binary, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Segmentation**: collapses consecutive log rows into work episodes and
//!   decides whether each episode completed its task
//! - **Scoring**: performance against a daily target and progress against
//!   weekly category goals, both computed for an explicit "today"
//! - **Features**: point-in-time training rows replayed from episode history
//! - **Ranking**: weighted priority per catalog task, optionally scaled by a
//!   completion model
//! - **Storage**: TOML configuration and JSON catalogs in one data directory
//!
//! ## Key Components
//!
//! - [`EpisodeSegmenter`]: log rows to episodes
//! - [`FeatureBuilder`]: episodes to [`TaskEvent`]s
//! - [`PriorityRanker`]: scores to [`Recommendation`]s
//! - [`RecommendationEngine`]: everything above, wired to the catalogs
//! - [`EngineConfig`]: engine configuration

pub mod analytics;
pub mod catalog;
pub mod category;
pub mod daily;
pub mod engine;
pub mod entry;
pub mod episode;
pub mod error;
pub mod features;
pub mod goals;
pub mod history;
pub mod model;
pub mod performance;
pub mod ranker;
pub mod storage;
pub mod training;

pub use analytics::LogSummary;
pub use catalog::{GoalCatalog, GoalPriority, TaskCatalog, TaskDefinition, TaskFilter, WeeklyGoal};
pub use category::{CategoryMapping, CategoryResolver, ResolveStrategy};
pub use daily::{DailyStats, DailyStatus, DailyTracker};
pub use engine::RecommendationEngine;
pub use entry::{sort_entries, TimeEntry, WorkRecord};
pub use episode::{Episode, EpisodeSegmenter, SegmentRow};
pub use error::{CatalogError, ConfigError, CoreError, ModelError, SegmentError};
pub use features::{FeatureBuilder, TaskEvent};
pub use goals::{CategoryProgress, GoalProgressScorer, GoalStatus};
pub use history::WorkHistory;
pub use model::{CompletionFeatures, CompletionModel, Prediction};
pub use performance::{PerformanceScorer, PerformanceSnapshot};
pub use ranker::{PriorityRanker, RankingWeights, Recommendation};
pub use storage::EngineConfig;
pub use training::{LogisticModel, TrainingConfig, TrainingReport};
