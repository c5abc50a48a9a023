//! Core error types for taskrec-core.
//!
//! This module defines the error hierarchy using thiserror. Scoring itself
//! never fails: unknown categories, empty windows and missing models degrade
//! to neutral values. Errors are reserved for precondition violations on
//! input data and for catalog/config I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for taskrec-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Episode segmentation errors
    #[error("Segmentation error: {0}")]
    Segment(#[from] SegmentError),

    /// Task/goal/category catalog errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Completion model errors
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Malformed time-log input handed to the segmenter.
#[derive(Error, Debug, PartialEq)]
pub enum SegmentError {
    /// Item starts before its predecessor
    #[error("Item {index} starts at {start}, before the preceding start {previous}; input must be sorted by start time")]
    Unsorted {
        index: usize,
        start: chrono::DateTime<chrono::FixedOffset>,
        previous: chrono::DateTime<chrono::FixedOffset>,
    },

    /// Row with a negative duration (e.g. a still-running timer)
    #[error("Row {index} ('{task_name}') has negative duration {duration_secs}s")]
    NegativeDuration {
        index: usize,
        task_name: String,
        duration_secs: i64,
    },

    /// Duration too large to place a stop time on the calendar
    #[error("Row {index} ('{task_name}') has duration {duration_secs}s, which is out of range")]
    DurationOutOfRange {
        index: usize,
        task_name: String,
        duration_secs: i64,
    },
}

/// Catalog errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Difficulty outside 1-5
    #[error("Invalid difficulty {difficulty} for task '{task}': must be between 1 and 5")]
    InvalidDifficulty { task: String, difficulty: u8 },

    /// Estimated duration must be positive
    #[error("Invalid estimated duration {hours}h for task '{task}'")]
    InvalidDuration { task: String, hours: f64 },

    /// Task not present in the catalog
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// Failed to load a catalog file
    #[error("Failed to load catalog from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save a catalog file
    #[error("Failed to save catalog to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Home / data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Completion model errors.
#[derive(Error, Debug)]
pub enum ModelError {
    /// No training rows
    #[error("Cannot fit a model on an empty training set")]
    EmptyTrainingSet,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
