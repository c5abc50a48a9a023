//! Weekly goal catalog.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

use super::{read_json, write_json};
use crate::error::CatalogError;

/// Goal priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    High,
    Medium,
    Low,
}

impl GoalPriority {
    /// Weight applied to the base goal score.
    pub fn multiplier(self) -> f64 {
        match self {
            GoalPriority::High => 1.2,
            GoalPriority::Medium => 1.0,
            GoalPriority::Low => 0.8,
        }
    }
}

impl fmt::Display for GoalPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalPriority::High => write!(f, "high"),
            GoalPriority::Medium => write!(f, "medium"),
            GoalPriority::Low => write!(f, "low"),
        }
    }
}

impl FromStr for GoalPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(GoalPriority::High),
            "medium" => Ok(GoalPriority::Medium),
            "low" => Ok(GoalPriority::Low),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

/// Hours to spend on a category this week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyGoal {
    pub category: String,
    /// `None` or `<= 0` means the goal is not tracked
    pub target_hours: Option<f64>,
    pub priority: GoalPriority,
}

impl WeeklyGoal {
    pub fn new(category: impl Into<String>, target_hours: f64, priority: GoalPriority) -> Self {
        Self {
            category: category.into(),
            target_hours: Some(target_hours),
            priority,
        }
    }

    /// Target if it can be divided by.
    pub fn usable_target(&self) -> Option<f64> {
        self.target_hours.filter(|t| *t > 0.0 && t.is_finite())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GoalRecord {
    #[serde(default)]
    target_hours: Option<f64>,
    /// Kept as text so one unknown level does not reject the whole file
    priority: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct GoalFile {
    #[serde(default)]
    weekly_goals: IndexMap<String, GoalRecord>,
}

/// Ordered weekly goals keyed by category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalCatalog {
    goals: IndexMap<String, WeeklyGoal>,
}

impl GoalCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_goals(goals: impl IntoIterator<Item = WeeklyGoal>) -> Self {
        Self {
            goals: goals
                .into_iter()
                .map(|g| (g.category.clone(), g))
                .collect(),
        }
    }

    /// Load `goals.json` (`weekly_goals`).
    ///
    /// An unrecognised priority is read as medium, which leaves the goal
    /// score unweighted.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let file: GoalFile = read_json(path)?;
        Ok(Self::from_goals(file.weekly_goals.into_iter().map(
            |(category, record)| {
                let priority = record.priority.parse().unwrap_or_else(|e| {
                    warn!(%category, error = %e, "treating goal priority as medium");
                    GoalPriority::Medium
                });
                WeeklyGoal {
                    category,
                    target_hours: record.target_hours,
                    priority,
                }
            },
        )))
    }

    pub fn load_or_empty(path: &Path) -> Result<Self, CatalogError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let file = GoalFile {
            weekly_goals: self
                .goals
                .values()
                .map(|g| {
                    (
                        g.category.clone(),
                        GoalRecord {
                            target_hours: g.target_hours,
                            priority: g.priority.to_string(),
                        },
                    )
                })
                .collect(),
        };
        write_json(path, &file)
    }

    pub fn get(&self, category: &str) -> Option<&WeeklyGoal> {
        self.goals.get(category)
    }

    /// All goals in catalog order.
    pub fn all(&self) -> impl Iterator<Item = &WeeklyGoal> {
        self.goals.values()
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// Categories ordered high, medium, low; catalog order within a level.
    pub fn priority_categories(&self) -> Vec<&str> {
        [GoalPriority::High, GoalPriority::Medium, GoalPriority::Low]
            .into_iter()
            .flat_map(|level| {
                self.all()
                    .filter(move |g| g.priority == level)
                    .map(|g| g.category.as_str())
            })
            .collect()
    }
}
