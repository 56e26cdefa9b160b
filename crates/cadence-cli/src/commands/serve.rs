use anyhow::{Context, Result};
use cadence_core::repository::SqliteRepository;

use crate::cli::ServeCommand;
use cadence_cli::api::create_router;
use cadence_cli::config::Config;

pub async fn serve(repo: SqliteRepository, config: &Config, command: ServeCommand) -> Result<()> {
    let host = command.host.unwrap_or_else(|| config.server.host.clone());
    let port = command.port.unwrap_or(config.server.port);
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);
    eprintln!("Serving the calendar API on http://{}/api/v1", addr);

    axum::serve(listener, create_router(repo)).await?;
    Ok(())
}
