//! Category resolution for time entries.
//!
//! An entry's project and description are mapped to a goal category by an
//! ordered list of strategies; the first one that matches wins:
//!
//! 1. exact (case-insensitive) task description
//! 2. keyword contained in the description
//! 3. project fallback
//! 4. default category
//!
//! New strategies are added as new [`ResolveStrategy`] variants and slotted
//! into the list without touching the others.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::entry::TimeEntry;
use crate::error::CatalogError;

/// Project fallback value meaning "the description decides".
pub const CHECK_TASK_DESCRIPTION: &str = "check_task_description";

/// On-disk layout of `category_mapping.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMapping {
    /// category -> task descriptions
    #[serde(default)]
    pub categories: IndexMap<String, Vec<String>>,
    /// category -> keywords
    #[serde(default)]
    pub keywords: IndexMap<String, Vec<String>>,
    /// project -> category, or [`CHECK_TASK_DESCRIPTION`]
    #[serde(default)]
    pub project_fallback: IndexMap<String, String>,
    #[serde(default = "default_category")]
    pub default_category: String,
}

fn default_category() -> String {
    "Other".into()
}

impl Default for CategoryMapping {
    fn default() -> Self {
        Self {
            categories: IndexMap::new(),
            keywords: IndexMap::new(),
            project_fallback: IndexMap::new(),
            default_category: default_category(),
        }
    }
}

/// What a project fallback resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectAction {
    Category(String),
    /// Description already failed to match; stop at the default.
    CheckDescription,
}

/// One rule in the resolution chain.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveStrategy {
    /// Normalized description -> category
    ExactDescription(HashMap<String, String>),
    /// (category, keywords) in priority order
    Keyword(Vec<(String, Vec<String>)>),
    /// Normalized project name -> action
    ProjectFallback(HashMap<String, ProjectAction>),
    /// Always matches
    Default(String),
}

enum Match<'a> {
    Category(&'a str),
    Default,
}

impl ResolveStrategy {
    fn apply(&self, project: &str, description: &str) -> Option<Match<'_>> {
        match self {
            ResolveStrategy::ExactDescription(lookup) => {
                lookup.get(description).map(|c| Match::Category(c.as_str()))
            }
            ResolveStrategy::Keyword(rules) => rules
                .iter()
                .find(|(_, keywords)| keywords.iter().any(|k| description.contains(k.as_str())))
                .map(|(category, _)| Match::Category(category.as_str())),
            ResolveStrategy::ProjectFallback(fallbacks) => {
                fallbacks.get(project).map(|action| match action {
                    ProjectAction::Category(c) => Match::Category(c.as_str()),
                    ProjectAction::CheckDescription => Match::Default,
                })
            }
            ResolveStrategy::Default(category) => Some(Match::Category(category.as_str())),
        }
    }
}

/// Lowercase, trim and drop the literal `nan` left behind by spreadsheet exports.
fn normalize(value: &str) -> String {
    let value = value.trim().to_lowercase();
    if value == "nan" {
        String::new()
    } else {
        value
    }
}

/// Maps entries to goal categories.
#[derive(Debug, Clone)]
pub struct CategoryResolver {
    mapping: CategoryMapping,
    strategies: Vec<ResolveStrategy>,
}

impl Default for CategoryResolver {
    fn default() -> Self {
        Self::new(CategoryMapping::default())
    }
}

impl CategoryResolver {
    /// Build the standard four-step chain from a mapping.
    pub fn new(mapping: CategoryMapping) -> Self {
        let strategies = Self::standard_strategies(&mapping);
        Self {
            mapping,
            strategies,
        }
    }

    /// Use a custom strategy chain. The mapping is kept for management calls.
    pub fn with_strategies(mapping: CategoryMapping, strategies: Vec<ResolveStrategy>) -> Self {
        Self {
            mapping,
            strategies,
        }
    }

    fn standard_strategies(mapping: &CategoryMapping) -> Vec<ResolveStrategy> {
        let mut exact = HashMap::new();
        for (category, tasks) in &mapping.categories {
            for task in tasks {
                exact.insert(normalize(task), category.clone());
            }
        }

        let keywords = mapping
            .keywords
            .iter()
            .map(|(category, words)| {
                let words = words
                    .iter()
                    .map(|w| normalize(w))
                    .filter(|w| !w.is_empty())
                    .collect();
                (category.clone(), words)
            })
            .collect();

        let fallbacks = mapping
            .project_fallback
            .iter()
            .map(|(project, action)| {
                let action = if action == CHECK_TASK_DESCRIPTION {
                    ProjectAction::CheckDescription
                } else {
                    ProjectAction::Category(action.clone())
                };
                (normalize(project), action)
            })
            .collect();

        vec![
            ResolveStrategy::ExactDescription(exact),
            ResolveStrategy::Keyword(keywords),
            ResolveStrategy::ProjectFallback(fallbacks),
            ResolveStrategy::Default(mapping.default_category.clone()),
        ]
    }

    /// Load `category_mapping.json`.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let mapping: CategoryMapping = crate::catalog::read_json(path)?;
        Ok(Self::new(mapping))
    }

    pub fn load_or_default(path: &Path) -> Result<Self, CatalogError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        crate::catalog::write_json(path, &self.mapping)
    }

    pub fn mapping(&self) -> &CategoryMapping {
        &self.mapping
    }

    pub fn default_category(&self) -> &str {
        &self.mapping.default_category
    }

    /// Resolve a project/description pair to a category.
    pub fn resolve(&self, project: Option<&str>, description: &str) -> &str {
        let project = normalize(project.unwrap_or(""));
        let description = normalize(description);

        for strategy in &self.strategies {
            match strategy.apply(&project, &description) {
                Some(Match::Category(category)) => return category,
                Some(Match::Default) => return self.default_category(),
                None => {}
            }
        }
        self.default_category()
    }

    /// Resolve a time entry.
    pub fn resolve_entry(&self, entry: &TimeEntry) -> &str {
        self.resolve(entry.project.as_deref(), &entry.description)
    }

    /// Register a task description under a category.
    pub fn add_task_to_category(&mut self, description: &str, category: &str) {
        let normalized = normalize(description);
        let tasks = self.mapping.categories.entry(category.to_string()).or_default();
        if !tasks.iter().any(|t| normalize(t) == normalized) {
            tasks.push(description.to_string());
        }

        for strategy in &mut self.strategies {
            if let ResolveStrategy::ExactDescription(lookup) = strategy {
                lookup.insert(normalized.clone(), category.to_string());
            }
        }
    }

    pub fn tasks_for_category(&self, category: &str) -> &[String] {
        self.mapping
            .categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn categories(&self) -> Vec<String> {
        self.mapping.categories.keys().cloned().collect()
    }

    /// Distinct non-empty descriptions that only resolve to the default category.
    pub fn unmapped_descriptions(&self, entries: &[TimeEntry]) -> Vec<String> {
        let mut unmapped: Vec<String> = Vec::new();
        for entry in entries {
            if self.resolve_entry(entry) == self.default_category() {
                let description = entry.description.trim();
                if !description.is_empty() && !unmapped.iter().any(|d| d == description) {
                    unmapped.push(description.to_string());
                }
            }
        }
        unmapped
    }
}
