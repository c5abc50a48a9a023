//! Task catalog commands for CLI.

use clap::Subcommand;
use taskrec_core::catalog::{TaskCatalog, TaskFilter};
use taskrec_core::storage::{data_file, CATEGORY_MAPPING_FILE, TASKS_FILE};
use taskrec_core::{CatalogError, CategoryResolver};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add or replace a task
    Add {
        /// Task name, as logged in the time tracker
        name: String,
        /// Goal category
        #[arg(long)]
        category: String,
        /// Difficulty 1-5
        #[arg(long, default_value = "3")]
        difficulty: u8,
        /// Estimated duration in hours
        #[arg(long, default_value = "1.0")]
        duration: f64,
    },
    /// Remove a task
    Remove {
        /// Task name
        name: String,
    },
    /// List tasks
    List {
        /// Only this category
        #[arg(long)]
        category: Option<String>,
        /// Only tasks at or below this difficulty
        #[arg(long)]
        max_difficulty: Option<u8>,
        /// Only tasks at or below this many hours
        #[arg(long)]
        max_duration: Option<f64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one task
    Show {
        /// Task name
        name: String,
    },
    /// Task count per category
    Summary,
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let path = data_file(TASKS_FILE)?;
    let mut catalog = TaskCatalog::load_or_empty(&path)?;

    match action {
        TaskAction::Add {
            name,
            category,
            difficulty,
            duration,
        } => {
            catalog.add_task(&name, &category, difficulty, duration)?;
            catalog.save(&path)?;
            println!("Task added: {name} [{category}]");
            if !known_categories()?.contains(&category) {
                eprintln!("warning: category '{category}' is not in the category mapping");
            }
        }
        TaskAction::Remove { name } => {
            catalog.remove_task(&name)?;
            catalog.save(&path)?;
            println!("Task removed: {name}");
        }
        TaskAction::List {
            category,
            max_difficulty,
            max_duration,
            json,
        } => {
            let tasks = catalog.filter(&TaskFilter {
                category,
                max_difficulty,
                max_duration,
            });
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks found.");
            } else {
                for t in tasks {
                    println!(
                        "{:<30} {:<15} difficulty {}  {:.2}h",
                        t.name, t.category, t.difficulty, t.estimated_duration
                    );
                }
            }
        }
        TaskAction::Show { name } => {
            let task = catalog
                .get(&name)
                .ok_or_else(|| CatalogError::TaskNotFound(name.clone()))?;
            println!("{}", serde_json::to_string_pretty(task)?);
            if let Some(label) = catalog.difficulty_description(task.difficulty) {
                println!("Difficulty {}: {label}", task.difficulty);
            }
        }
        TaskAction::Summary => {
            println!("{}", serde_json::to_string_pretty(&catalog.categories_summary())?);
            let unknown = catalog.unknown_categories(&known_categories()?);
            if !unknown.is_empty() {
                eprintln!("warning: tasks in categories missing from the category mapping:");
                for task in unknown {
                    eprintln!("  {task}");
                }
            }
        }
    }
    Ok(())
}

fn known_categories() -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let resolver = CategoryResolver::load_or_default(&data_file(CATEGORY_MAPPING_FILE)?)?;
    Ok(resolver.categories())
}
