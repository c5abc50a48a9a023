//! TOML-based engine configuration.
//!
//! Holds every tunable of the scoring pipeline:
//! - Episode segmentation thresholds and unknown-task defaults
//! - Performance window and daily target
//! - Ranking weights
//! - Rolling window for daily stats
//!
//! Configuration is stored at `<data dir>/config.toml`. Components take the
//! relevant section by value at construction; nothing reads it globally.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{data_file, CONFIG_FILE};
use crate::error::ConfigError;

/// Episode segmentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Break (minutes) that starts a new episode
    #[serde(default = "default_gap_minutes")]
    pub gap_minutes: i64,
    /// Share of the estimate that counts as done
    #[serde(default = "default_completion_factor")]
    pub completion_factor: f64,
    /// Estimate used for tasks missing from the catalog
    #[serde(default = "default_estimated_minutes")]
    pub default_estimated_minutes: f64,
    #[serde(default = "default_category")]
    pub default_category: String,
    #[serde(default = "default_difficulty")]
    pub default_difficulty: u8,
}

/// Recent-performance settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceConfig {
    #[serde(default = "default_daily_target_hours")]
    pub daily_target_hours: f64,
    /// Trailing window length, today included
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

/// Ranking weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default = "default_performance_weight")]
    pub performance_weight: f64,
    #[serde(default = "default_goal_weight")]
    pub goal_weight: f64,
    /// Recommendations shown by default
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

/// Daily stats settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyConfig {
    /// Days before today averaged by the daily tracker
    #[serde(default = "default_rolling_window_days")]
    pub rolling_window_days: u32,
}

/// Engine configuration.
///
/// Serialized to/from TOML at `<data dir>/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub segmentation: SegmentationConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub daily: DailyConfig,
}

/// Longest gap that may still join two rows into one episode
pub const MAX_GAP_MINUTES: i64 = 7 * 24 * 60;
/// Longest look-back window for performance and daily stats
pub const MAX_WINDOW_DAYS: u32 = 366;

// Default functions
fn default_gap_minutes() -> i64 {
    5
}
fn default_completion_factor() -> f64 {
    0.90
}
fn default_estimated_minutes() -> f64 {
    30.0
}
fn default_category() -> String {
    "Misc".into()
}
fn default_difficulty() -> u8 {
    3
}
fn default_daily_target_hours() -> f64 {
    6.0
}
fn default_window_days() -> u32 {
    3
}
fn default_performance_weight() -> f64 {
    0.4
}
fn default_goal_weight() -> f64 {
    0.6
}
fn default_top_n() -> usize {
    3
}
fn default_rolling_window_days() -> u32 {
    7
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            gap_minutes: default_gap_minutes(),
            completion_factor: default_completion_factor(),
            default_estimated_minutes: default_estimated_minutes(),
            default_category: default_category(),
            default_difficulty: default_difficulty(),
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            daily_target_hours: default_daily_target_hours(),
            window_days: default_window_days(),
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            performance_weight: default_performance_weight(),
            goal_weight: default_goal_weight(),
            top_n: default_top_n(),
        }
    }
}

impl Default for DailyConfig {
    fn default() -> Self {
        Self {
            rolling_window_days: default_rolling_window_days(),
        }
    }
}

impl EngineConfig {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(unknown());
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location inside the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        data_file(CONFIG_FILE)
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load and validate a config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        let cfg: EngineConfig = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory.
    ///
    /// The updated config is validated before it replaces `self`; on error
    /// `self` is left unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: EngineConfig =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check value ranges the scorers rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| {
            Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: message.to_string(),
            })
        };

        let seg = &self.segmentation;
        if !(0..=MAX_GAP_MINUTES).contains(&seg.gap_minutes) {
            return invalid("segmentation.gap_minutes", "must be between 0 and 10080 (one week)");
        }
        if !(seg.completion_factor > 0.0 && seg.completion_factor <= 1.0) {
            return invalid("segmentation.completion_factor", "must be in (0, 1]");
        }
        if !(seg.default_estimated_minutes > 0.0) {
            return invalid("segmentation.default_estimated_minutes", "must be > 0");
        }
        if !(1..=5).contains(&seg.default_difficulty) {
            return invalid("segmentation.default_difficulty", "must be between 1 and 5");
        }
        if !(self.performance.daily_target_hours > 0.0) {
            return invalid("performance.daily_target_hours", "must be > 0");
        }
        if !(1..=MAX_WINDOW_DAYS).contains(&self.performance.window_days) {
            return invalid("performance.window_days", "must be between 1 and 366");
        }
        let rank = &self.ranking;
        if rank.performance_weight < 0.0 || rank.goal_weight < 0.0 {
            return invalid("ranking", "weights must be >= 0");
        }
        if !(rank.performance_weight + rank.goal_weight > 0.0) {
            return invalid("ranking", "weights must not both be zero");
        }
        if !(1..=MAX_WINDOW_DAYS).contains(&self.daily.rolling_window_days) {
            return invalid("daily.rolling_window_days", "must be between 1 and 366");
        }
        Ok(())
    }
}
