use cadence_cli::config::Config;
use cadence_core::db;
use cadence_core::error::CoreError;
use cadence_core::recurrence::MaterializationManager;
use cadence_core::repository::SqliteRepository;
use clap::Parser;
use owo_colors::{OwoColorize, Style};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod parser;
mod util;
mod views;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    let config = match Config::new() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} Invalid configuration: {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    let db_pool = match db::establish_connection(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            handle_error(e.into());
            std::process::exit(1);
        }
    };
    let materialization_manager = MaterializationManager::new((&config.materialization).into());
    let repository = SqliteRepository::new(db_pool, materialization_manager);

    let result = match cli.command {
        cli::Commands::Serve(command) => {
            commands::serve::serve(repository.clone(), &config, command).await
        }
        cli::Commands::Add(command) => commands::add::add_action(&repository, command).await,
        cli::Commands::Edit(command) => commands::edit::edit_action(&repository, command).await,
        cli::Commands::Delete(command) => {
            commands::delete::delete_action(&repository, command).await
        }
        cli::Commands::Range(command) => commands::range::show_range(&repository, command).await,
        cli::Commands::Show(command) => commands::show::show_event(&repository, command).await,
        cli::Commands::Repair => commands::repair::repair(&repository).await,
        cli::Commands::Note(command) => commands::note::handle_note(&repository, command).await,
        cli::Commands::Skip(command) => commands::skip::handle_skip(&repository, command).await,
        cli::Commands::Category(command) => {
            commands::category::handle_category(&repository, command).await
        }
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so table and JSON output on stdout stay clean.
/// `RUST_LOG` wins over the configured filter.
fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::ActionNotFound(id) => {
                eprintln!(
                    "{} No action with ID '{}'",
                    "Error:".style(error_style),
                    id.to_string().yellow()
                );
            }
            CoreError::OccurrenceNotFound(id) => {
                eprintln!(
                    "{} No occurrence with ID '{}'",
                    "Error:".style(error_style),
                    id.to_string().yellow()
                );
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            CoreError::InvalidRecurrencePattern(s) => {
                eprintln!(
                    "{} Invalid recurrence pattern: {}",
                    "Error:".style(error_style),
                    s.yellow()
                );
            }
            CoreError::PartialMaterialization { created, expected, source } => {
                eprintln!(
                    "{} Could not generate occurrences ({} of {} written, all rolled back): {}",
                    "Error:".style(error_style),
                    created,
                    expected,
                    source
                );
            }
            _ => eprintln!("{} {:#}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {:#}", "Error:".style(error_style), err);
    }
}
