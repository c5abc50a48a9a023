//! Task catalog: the candidate tasks the ranker chooses from.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{read_json, write_json};
use crate::error::CatalogError;

/// A task the user can work on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub name: String,
    pub category: String,
    /// 1 (trivial) to 5 (hard)
    pub difficulty: u8,
    /// Hours
    pub estimated_duration: f64,
}

impl TaskDefinition {
    pub fn new(name: impl Into<String>, category: impl Into<String>, difficulty: u8, estimated_duration: f64) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            difficulty,
            estimated_duration,
        }
    }

    /// Estimated duration in minutes.
    pub fn estimated_minutes(&self) -> f64 {
        self.estimated_duration * 60.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TaskRecord {
    category: String,
    difficulty: u8,
    #[serde(default = "default_estimated_duration")]
    estimated_duration: f64,
}

fn default_estimated_duration() -> f64 {
    1.0
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TaskFile {
    #[serde(default)]
    available_tasks: IndexMap<String, TaskRecord>,
    #[serde(default)]
    difficulty_levels: IndexMap<String, String>,
}

/// Criteria for [`TaskCatalog::filter`]; unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub category: Option<String>,
    pub max_difficulty: Option<u8>,
    pub max_duration: Option<f64>,
}

/// Ordered task catalog.
///
/// Difficulty is validated on every mutation so that scoring never sees a
/// value outside 1-5.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskCatalog {
    tasks: IndexMap<String, TaskDefinition>,
    difficulty_levels: IndexMap<String, String>,
}

impl TaskCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from definitions, validating each one.
    pub fn from_tasks(tasks: impl IntoIterator<Item = TaskDefinition>) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for task in tasks {
            catalog.insert(task)?;
        }
        Ok(catalog)
    }

    /// Load `tasks.json` (`available_tasks` + `difficulty_levels`).
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let file: TaskFile = read_json(path)?;
        let mut catalog = Self {
            tasks: IndexMap::new(),
            difficulty_levels: file.difficulty_levels,
        };
        for (name, record) in file.available_tasks {
            catalog.add_task(&name, &record.category, record.difficulty, record.estimated_duration)?;
        }
        Ok(catalog)
    }

    /// Load if the file exists, otherwise start empty.
    pub fn load_or_empty(path: &Path) -> Result<Self, CatalogError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    /// Write back in the same layout as [`TaskCatalog::load`] reads.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let file = TaskFile {
            available_tasks: self
                .tasks
                .iter()
                .map(|(name, t)| {
                    (
                        name.clone(),
                        TaskRecord {
                            category: t.category.clone(),
                            difficulty: t.difficulty,
                            estimated_duration: t.estimated_duration,
                        },
                    )
                })
                .collect(),
            difficulty_levels: self.difficulty_levels.clone(),
        };
        write_json(path, &file)
    }

    /// Add or replace a task.
    ///
    /// # Errors
    /// Rejects difficulty outside 1-5 and non-positive durations.
    pub fn add_task(
        &mut self,
        name: &str,
        category: &str,
        difficulty: u8,
        estimated_duration: f64,
    ) -> Result<(), CatalogError> {
        self.insert(TaskDefinition {
            name: name.to_string(),
            category: category.to_string(),
            difficulty,
            estimated_duration,
        })
    }

    fn insert(&mut self, task: TaskDefinition) -> Result<(), CatalogError> {
        if !(1..=5).contains(&task.difficulty) {
            return Err(CatalogError::InvalidDifficulty {
                task: task.name,
                difficulty: task.difficulty,
            });
        }
        if !(task.estimated_duration > 0.0) || !task.estimated_duration.is_finite() {
            return Err(CatalogError::InvalidDuration {
                task: task.name,
                hours: task.estimated_duration,
            });
        }
        self.tasks.insert(task.name.clone(), task);
        Ok(())
    }

    /// Remove a task, keeping the order of the rest.
    pub fn remove_task(&mut self, name: &str) -> Result<TaskDefinition, CatalogError> {
        self.tasks
            .shift_remove(name)
            .ok_or_else(|| CatalogError::TaskNotFound(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&TaskDefinition> {
        self.tasks.get(name)
    }

    /// All tasks in catalog order.
    pub fn all(&self) -> impl Iterator<Item = &TaskDefinition> {
        self.tasks.values()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn by_category(&self, category: &str) -> Vec<&TaskDefinition> {
        self.all().filter(|t| t.category == category).collect()
    }

    pub fn by_difficulty(&self, difficulty: u8) -> Vec<&TaskDefinition> {
        self.all().filter(|t| t.difficulty == difficulty).collect()
    }

    /// Tasks that fit within `max_duration` hours.
    pub fn by_duration(&self, max_duration: f64) -> Vec<&TaskDefinition> {
        self.all().filter(|t| t.estimated_duration <= max_duration).collect()
    }

    pub fn filter(&self, filter: &TaskFilter) -> Vec<&TaskDefinition> {
        self.all()
            .filter(|t| filter.category.as_deref().map_or(true, |c| t.category == c))
            .filter(|t| filter.max_difficulty.map_or(true, |d| t.difficulty <= d))
            .filter(|t| filter.max_duration.map_or(true, |h| t.estimated_duration <= h))
            .collect()
    }

    /// Number of tasks per category, in first-seen order.
    pub fn categories_summary(&self) -> IndexMap<String, usize> {
        let mut summary = IndexMap::new();
        for task in self.all() {
            *summary.entry(task.category.clone()).or_insert(0) += 1;
        }
        summary
    }

    /// Human-readable label for a difficulty level, if the catalog has one.
    pub fn difficulty_description(&self, difficulty: u8) -> Option<&str> {
        self.difficulty_levels
            .get(&difficulty.to_string())
            .map(String::as_str)
    }

    /// `name: category` for every task whose category is not in `known`.
    pub fn unknown_categories(&self, known: &[String]) -> Vec<String> {
        self.all()
            .filter(|t| !known.contains(&t.category))
            .map(|t| format!("{}: {}", t.name, t.category))
            .collect()
    }
}
