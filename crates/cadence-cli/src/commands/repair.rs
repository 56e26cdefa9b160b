use anyhow::Result;
use cadence_core::repository::Repository;
use owo_colors::OwoColorize;

pub async fn repair(repo: &impl Repository) -> Result<()> {
    let summary = repo.materialize_all().await?;

    println!(
        "{} Regenerated {} occurrence(s) for {} action(s) in {} ms",
        "✓".green().bold(),
        summary.occurrences_created.to_string().cyan(),
        summary.actions_processed.to_string().cyan(),
        summary.duration_ms
    );

    if summary.actions_with_errors > 0 {
        println!(
            "{} {} action(s) could not be regenerated:",
            "!".yellow().bold(),
            summary.actions_with_errors
        );
        for error in &summary.errors {
            println!("  {} {}", "•".bright_black(), error);
        }
    }

    Ok(())
}
