pub mod categories;
pub mod config;
pub mod log;
pub mod recommend;
pub mod report;
pub mod task;
pub mod train;

use chrono::{DateTime, FixedOffset, Local};
use std::path::Path;
use taskrec_core::TimeEntry;

/// Read a JSON array of time entries.
pub fn load_entries(path: &Path) -> Result<Vec<TimeEntry>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read entries from {}: {e}", path.display()))?;
    let entries: Vec<TimeEntry> = serde_json::from_str(&content)
        .map_err(|e| format!("invalid entries file {}: {e}", path.display()))?;
    tracing::debug!(entries = entries.len(), path = %path.display(), "loaded time log");
    Ok(entries)
}

/// `--now` if given, else the local clock.
pub fn resolve_now(now: Option<&str>) -> Result<DateTime<FixedOffset>, Box<dyn std::error::Error>> {
    match now {
        Some(s) => Ok(DateTime::parse_from_rfc3339(s).map_err(|e| format!("invalid --now '{s}': {e}"))?),
        None => Ok(Local::now().into()),
    }
}
