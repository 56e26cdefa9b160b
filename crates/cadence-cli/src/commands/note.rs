use anyhow::Result;
use cadence_core::models::NewNoteData;
use cadence_core::repository::Repository;
use owo_colors::OwoColorize;
use uuid::Uuid;

use crate::cli::{AddNoteCommand, DeleteNoteCommand, ListNotesCommand, NoteCommand, NoteSubcommand};
use crate::parser::parse_date;
use crate::util::{occurrence_on, resolve_action_id};
use crate::views::table::display_notes;

pub async fn handle_note(repo: &impl Repository, command: NoteCommand) -> Result<()> {
    match command.command {
        NoteSubcommand::Add(cmd) => add_note(repo, cmd).await,
        NoteSubcommand::List(cmd) => list_notes(repo, cmd).await,
        NoteSubcommand::Delete(cmd) => delete_note(repo, cmd).await,
    }
}

async fn add_note(repo: &impl Repository, command: AddNoteCommand) -> Result<()> {
    let action_id = resolve_action_id(repo, &command.action).await?;
    let date = parse_date(&command.date)?;
    let occurrence = occurrence_on(repo, action_id, date).await?;

    let note = repo
        .add_note(
            occurrence.id,
            NewNoteData {
                text: command.text,
                note_type: command.note_type.map(Into::into),
            },
        )
        .await?;

    println!(
        "{} Added note to {} ({})",
        "✓".green().bold(),
        date.to_string().cyan(),
        note.id.to_string().yellow()
    );
    Ok(())
}

async fn list_notes(repo: &impl Repository, command: ListNotesCommand) -> Result<()> {
    let action_id = resolve_action_id(repo, &command.action).await?;
    let date = parse_date(&command.date)?;
    let occurrence = occurrence_on(repo, action_id, date).await?;

    let notes = repo.find_notes_for_occurrence(occurrence.id).await?;
    display_notes(&notes);
    Ok(())
}

async fn delete_note(repo: &impl Repository, command: DeleteNoteCommand) -> Result<()> {
    let id = Uuid::parse_str(&command.id)?;
    repo.delete_note(id).await?;
    println!("{} Deleted note {}", "✓".green().bold(), id.to_string().yellow());
    Ok(())
}
