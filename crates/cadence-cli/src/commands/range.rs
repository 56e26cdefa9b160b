use anyhow::Result;
use cadence_core::repository::Repository;
use chrono::Duration;

use crate::cli::RangeCommand;
use crate::parser::{parse_date, today};
use crate::views::table::display_days;

pub async fn show_range(repo: &impl Repository, command: RangeCommand) -> Result<()> {
    let start = match command.start.as_deref() {
        Some(input) => parse_date(input)?,
        None => today(),
    };
    let end = match command.end.as_deref() {
        Some(input) => parse_date(input)?,
        None => start + Duration::days(6),
    };

    let days = repo.query_range(start, end).await?;

    if command.json {
        println!("{}", serde_json::to_string_pretty(&days)?);
    } else {
        display_days(&days);
    }
    Ok(())
}
