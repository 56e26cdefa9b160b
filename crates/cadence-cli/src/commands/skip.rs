use anyhow::Result;
use cadence_core::models::NewExceptionData;
use cadence_core::repository::Repository;
use owo_colors::OwoColorize;

use crate::cli::SkipCommand;
use crate::parser::parse_date;
use crate::util::resolve_action_id;
use crate::views::table::display_exceptions;

pub async fn handle_skip(repo: &impl Repository, command: SkipCommand) -> Result<()> {
    let action_id = resolve_action_id(repo, &command.action).await?;

    let Some(input) = command.date.as_deref() else {
        let exceptions = repo.find_exceptions(action_id).await?;
        display_exceptions(&exceptions);
        return Ok(());
    };
    let date = parse_date(input)?;

    if command.undo {
        repo.remove_exception(action_id, date).await?;
        println!("{} {} is back on the calendar", "✓".green().bold(), date.to_string().cyan());
        return Ok(());
    }

    let exception = repo
        .add_exception(
            action_id,
            NewExceptionData {
                date,
                reason: command.reason.into(),
                notes: command.notes,
            },
        )
        .await?;

    println!(
        "{} Marked {} as {}",
        "✓".green().bold(),
        exception.date.to_string().cyan(),
        exception.reason.to_string().yellow()
    );
    Ok(())
}
