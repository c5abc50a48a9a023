//! Task and weekly-goal catalogs.
//!
//! Both catalogs are owned outside the scoring core and handed to it as
//! read-only snapshots. Iteration order is the file order and is what the
//! ranker falls back to for ties.

mod goal;
mod task;

pub use goal::{GoalCatalog, GoalPriority, WeeklyGoal};
pub use task::{TaskCatalog, TaskDefinition, TaskFilter};

use std::path::Path;

use crate::error::CatalogError;

pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let load_failed = |message: String| CatalogError::LoadFailed {
        path: path.to_path_buf(),
        message,
    };
    let content = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| load_failed(e.to_string()))
}

pub(crate) fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), CatalogError> {
    let save_failed = |message: String| CatalogError::SaveFailed {
        path: path.to_path_buf(),
        message,
    };
    let content = serde_json::to_string_pretty(value).map_err(|e| save_failed(e.to_string()))?;
    std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
}
