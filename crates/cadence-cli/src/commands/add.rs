use anyhow::Result;
use cadence_core::models::NewActionData;
use cadence_core::repository::Repository;
use owo_colors::{OwoColorize, Style};

use crate::cli::AddCommand;
use crate::parser::{parse_date, parse_duration, parse_hour, parse_pattern};
use crate::util::{format_hour, resolve_category};

pub async fn add_action(repo: &impl Repository, command: AddCommand) -> Result<()> {
    let start_date = command.date.as_deref().map(parse_date).transpose()?;
    let end_date = command.end.as_deref().map(parse_date).transpose()?;
    let recurrence_pattern = parse_pattern(command.every.as_deref(), command.on.as_deref())?;
    let recurrence_end_date = command.until.as_deref().map(parse_date).transpose()?;
    let hour = command.at.as_deref().map(parse_hour).transpose()?;
    let duration = command.duration.as_deref().map(parse_duration).transpose()?;
    let category_id = match command.category.as_deref() {
        Some(name) => Some(resolve_category(repo, name).await?.id),
        None => None,
    };

    // A pattern only expands over a range, so asking for one implies it
    let is_date_range = end_date.is_some() || recurrence_pattern.is_some();

    let data = NewActionData {
        text: command.text,
        color: command.color,
        status: command.status.map(Into::into),
        start_date,
        end_date,
        is_date_range,
        hour,
        leverage: command.leverage,
        location: command.location,
        duration_amount: duration.map(|(amount, _)| amount),
        duration_unit: duration.map(|(_, unit)| unit),
        recurrence_pattern,
        recurrence_end_date,
        category_id,
        ..Default::default()
    };

    let action = repo.add_action(data).await?;
    let occurrences = repo.find_occurrences_for_action(action.id).await?;

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();

    println!(
        "{} Created action: {}",
        "✓".style(success_style),
        action.text.bright_white().bold()
    );
    println!("  {} Action ID: {}", "→".style(info_style), action.id.to_string().yellow());

    match (occurrences.first(), occurrences.last()) {
        (Some(first), Some(last)) if occurrences.len() > 1 => println!(
            "  {} {} occurrences from {} to {}",
            "→".style(info_style),
            occurrences.len(),
            first.date.to_string().cyan(),
            last.date.to_string().cyan()
        ),
        (Some(only), _) => println!("  {} On {}", "→".style(info_style), only.date.to_string().cyan()),
        _ => println!("  {} Not scheduled on any date yet", "→".style(info_style)),
    }

    if let Some(pattern) = &action.recurrence_pattern {
        println!("  {} Repeats {}", "→".style(info_style), pattern.to_string().cyan());
    }
    if let Some(hour) = action.hour {
        println!("  {} At {}", "→".style(info_style), format_hour(hour).cyan());
    }

    Ok(())
}
