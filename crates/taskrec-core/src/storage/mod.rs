//! On-disk locations for configuration and catalogs.
//!
//! Everything lives in one data directory; the files themselves are owned by
//! [`config`] and [`crate::catalog`].

mod config;

pub use config::{DailyConfig, EngineConfig, PerformanceConfig, RankingConfig, SegmentationConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// File name of the engine configuration.
pub const CONFIG_FILE: &str = "config.toml";
/// File name of the task catalog.
pub const TASKS_FILE: &str = "tasks.json";
/// File name of the weekly goal catalog.
pub const GOALS_FILE: &str = "goals.json";
/// File name of the category mapping.
pub const CATEGORY_MAPPING_FILE: &str = "category_mapping.json";

/// Returns the data directory, creating it if needed.
///
/// Resolution order:
/// - `TASKREC_DATA_DIR` if set
/// - `~/.config/taskrec-dev/` when `TASKREC_ENV=dev`
/// - `~/.config/taskrec/`
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("TASKREC_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("TASKREC_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("taskrec-dev")
            } else {
                base_dir.join("taskrec")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Path of a file inside the data directory.
pub fn data_file(name: &str) -> Result<PathBuf, ConfigError> {
    Ok(data_dir()?.join(name))
}
