use anyhow::{anyhow, bail, Result};
use cadence_core::error::CoreError;
use cadence_core::models::{Category, Occurrence};
use cadence_core::repository::Repository;
use chrono::NaiveDate;
use uuid::Uuid;

/// Resolves a full action ID, or a unique prefix or suffix of one.
///
/// The head of a v7 id is a millisecond timestamp and the tail is random, so
/// the short form printed by the CLI is the tail.
pub async fn resolve_action_id(repo: &impl Repository, input: &str) -> Result<Uuid> {
    if let Ok(id) = input.parse::<Uuid>() {
        return Ok(id);
    }

    let fragment = input.trim().to_lowercase();
    if fragment.len() < 4 {
        return Err(anyhow!(CoreError::InvalidInput(
            "Short ID must be at least 4 characters long.".to_string()
        )));
    }

    let matches: Vec<_> = repo
        .find_actions()
        .await?
        .into_iter()
        .filter(|a| {
            let id = a.id.to_string();
            id.starts_with(&fragment) || id.ends_with(&fragment)
        })
        .collect();

    match matches.as_slice() {
        [] => Err(anyhow!(CoreError::NotFound(format!(
            "No action found matching ID '{}'",
            input
        )))),
        [action] => Ok(action.id),
        many => {
            let candidates: Vec<String> = many
                .iter()
                .map(|a| format!("  {} ({})", a.id, a.text))
                .collect();
            bail!(
                "Ambiguous ID '{}'. Did you mean one of these?\n{}",
                input,
                candidates.join("\n")
            )
        }
    }
}

/// The occurrence of `action_id` on `date`, oldest first if several exist.
pub async fn occurrence_on(repo: &impl Repository, action_id: Uuid, date: NaiveDate) -> Result<Occurrence> {
    repo.find_occurrences_for_action(action_id)
        .await?
        .into_iter()
        .find(|o| o.date == date)
        .ok_or_else(|| {
            anyhow!(CoreError::NotFound(format!(
                "Action {} has no occurrence on {}",
                action_id, date
            )))
        })
}

/// Looks a category up by name, case-insensitively.
pub async fn resolve_category(repo: &impl Repository, name: &str) -> Result<Category> {
    repo.find_categories()
        .await?
        .into_iter()
        .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| anyhow!(CoreError::NotFound(format!("Category '{}' not found", name))))
}

pub fn short_id(id: &Uuid) -> String {
    let id = id.to_string();
    id[id.len() - 8..].to_string()
}

/// Renders a decimal hour as `HH:MM`.
pub fn format_hour(hour: f64) -> String {
    let total_minutes = (hour * 60.0).round() as i64;
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}
