use anyhow::Result;
use cadence_core::error::CoreError;
use cadence_core::repository::Repository;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::cli::DeleteCommand;
use crate::util::resolve_action_id;

pub async fn delete_action(repo: &impl Repository, command: DeleteCommand) -> Result<()> {
    let action_id = resolve_action_id(repo, &command.id).await?;
    let action = repo
        .find_action_by_id(action_id)
        .await?
        .ok_or(CoreError::ActionNotFound(action_id))?;

    if !command.force {
        let occurrences = repo.find_occurrences_for_action(action_id).await?;
        let confirmation = Confirm::new()
            .with_prompt(format!(
                "Delete '{}' and its {} occurrence(s) with all their notes?",
                action.text,
                occurrences.len()
            ))
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    repo.delete_action(action_id).await?;
    println!("{} Deleted action: {}", "✓".green().bold(), action.text.bright_white());
    Ok(())
}
