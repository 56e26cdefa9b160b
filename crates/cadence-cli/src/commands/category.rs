use anyhow::Result;
use cadence_core::models::NewCategoryData;
use cadence_core::repository::Repository;
use owo_colors::OwoColorize;

use crate::cli::{CategoryCommand, CategorySubcommand};
use crate::util::resolve_category;
use crate::views::table::display_categories;

pub async fn handle_category(repo: &impl Repository, command: CategoryCommand) -> Result<()> {
    match command.command {
        CategorySubcommand::Add(cmd) => {
            let category = repo
                .add_category(NewCategoryData {
                    name: cmd.name,
                    color: cmd.color,
                })
                .await?;
            println!(
                "{} Created category: {}",
                "✓".green().bold(),
                category.name.bright_white().bold()
            );
        }
        CategorySubcommand::List => {
            let categories = repo.find_categories().await?;
            display_categories(&categories);
        }
        CategorySubcommand::Delete(cmd) => {
            let category = resolve_category(repo, &cmd.name).await?;
            repo.delete_category(category.id).await?;
            println!("{} Deleted category: {}", "✓".green().bold(), category.name);
        }
    }
    Ok(())
}
