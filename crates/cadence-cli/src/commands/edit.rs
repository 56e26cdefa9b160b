use anyhow::Result;
use cadence_core::models::UpdateActionData;
use cadence_core::repository::Repository;
use owo_colors::OwoColorize;

use crate::cli::EditCommand;
use crate::parser::{parse_date, parse_duration, parse_hour, parse_pattern};
use crate::util::{resolve_action_id, resolve_category};

/// `Some(None)` when the clear flag is set, `Some(Some(v))` when a value was
/// given, `None` to leave the field alone.
fn clearable<T>(clear: bool, value: Option<T>) -> Option<Option<T>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}

pub async fn edit_action(repo: &impl Repository, command: EditCommand) -> Result<()> {
    let action_id = resolve_action_id(repo, &command.id).await?;

    let start_date = command.date.as_deref().map(parse_date).transpose()?;
    let end_date = command.end.as_deref().map(parse_date).transpose()?;
    let pattern = parse_pattern(command.every.as_deref(), command.on.as_deref())?;
    let until = command.until.as_deref().map(parse_date).transpose()?;
    let hour = command.at.as_deref().map(parse_hour).transpose()?;
    let duration = command.duration.as_deref().map(parse_duration).transpose()?;
    let category_id = match command.category.as_deref() {
        Some(name) => Some(resolve_category(repo, name).await?.id),
        None => None,
    };

    // Giving an end date or a pattern turns a single-day action into a range
    let is_date_range = if end_date.is_some() || pattern.is_some() {
        Some(true)
    } else {
        None
    };

    let update = UpdateActionData {
        text: command.text,
        status: command.status.map(Into::into),
        start_date: clearable(command.date_clear, start_date),
        end_date: clearable(command.end_clear, end_date),
        is_date_range,
        hour: clearable(command.at_clear, hour),
        location: clearable(command.location_clear, command.location),
        duration_amount: clearable(command.duration_clear, duration.map(|(amount, _)| amount)),
        duration_unit: clearable(command.duration_clear, duration.map(|(_, unit)| unit)),
        recurrence_pattern: clearable(command.every_clear, pattern),
        recurrence_end_date: clearable(command.until_clear, until),
        category_id: clearable(command.category_clear, category_id),
        ..Default::default()
    };

    let action = repo.update_action(action_id, update).await?;
    let occurrences = repo.find_occurrences_for_action(action.id).await?;

    println!(
        "{} Updated action: {}",
        "✓".green().bold(),
        action.text.bright_white().bold()
    );
    println!(
        "  {} {} occurrence(s) regenerated",
        "→".blue(),
        occurrences.len().to_string().cyan()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::clearable;

    #[test]
    fn clear_flag_wins_over_missing_value() {
        assert_eq!(clearable::<u8>(true, None), Some(None));
        assert_eq!(clearable(false, Some(3)), Some(Some(3)));
        assert_eq!(clearable::<u8>(false, None), None);
    }
}
