use anyhow::Result;
use cadence_core::error::CoreError;
use cadence_core::repository::Repository;
use uuid::Uuid;

use crate::cli::ShowCommand;
use crate::util::resolve_action_id;
use crate::views::table::display_event;

pub async fn show_event(repo: &impl Repository, command: ShowCommand) -> Result<()> {
    // Occurrence ids are only accepted in full; short forms resolve to actions
    let id = match Uuid::parse_str(&command.id) {
        Ok(id) => id,
        Err(_) => resolve_action_id(repo, &command.id).await?,
    };

    let day = repo
        .resolve_event(id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("No action or occurrence with id {}", id)))?;

    if command.json {
        println!("{}", serde_json::to_string_pretty(&day)?);
    } else {
        display_event(&day);
    }
    Ok(())
}
