//! Category mapping commands for CLI.

use clap::Subcommand;
use std::path::PathBuf;
use taskrec_core::storage::{data_file, CATEGORY_MAPPING_FILE};
use taskrec_core::CategoryResolver;

use super::load_entries;

#[derive(Subcommand)]
pub enum CategoryAction {
    /// List mapped categories and their task descriptions
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Descriptions in a time log that only reach the default category
    Unmapped {
        /// JSON time log
        #[arg(long)]
        entries: PathBuf,
    },
    /// Map a task description to a category
    Add {
        /// Description as logged in the time tracker
        description: String,
        /// Goal category
        #[arg(long)]
        category: String,
    },
}

pub fn run(action: CategoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let path = data_file(CATEGORY_MAPPING_FILE)?;
    let mut resolver = CategoryResolver::load_or_default(&path)?;

    match action {
        CategoryAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&resolver.mapping().categories)?);
                return Ok(());
            }
            let categories = resolver.categories();
            if categories.is_empty() {
                println!("No categories mapped.");
            }
            for category in categories {
                println!("{category}: {}", resolver.tasks_for_category(&category).join(", "));
            }
            println!("Default: {}", resolver.default_category());
        }
        CategoryAction::Unmapped { entries } => {
            let entries = load_entries(&entries)?;
            let unmapped = resolver.unmapped_descriptions(&entries);
            if unmapped.is_empty() {
                println!("Every description maps to a category.");
            }
            for description in unmapped {
                println!("{description}");
            }
        }
        CategoryAction::Add {
            description,
            category,
        } => {
            resolver.add_task_to_category(&description, &category);
            resolver.save(&path)?;
            println!("Mapped: {description} -> {category}");
        }
    }
    Ok(())
}
