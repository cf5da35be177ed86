// ABOUTME: Entry point for the eventbook binary.
// ABOUTME: Parses CLI arguments, initializes tracing, opens the event database, and starts the HTTP server.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use eventbook_core::SystemClock;
use eventbook_server::{AppState, EventbookConfig, create_router};
use eventbook_store::SqliteEventStore;

/// Event catalog service: dated events over a JSON HTTP API.
#[derive(Parser, Debug)]
#[command(name = "eventbook", version, about, long_about = None)]
struct Cli {
    /// Address to listen on, as host:port (overrides EVENTBOOK_BIND)
    bind: Option<String>,

    /// Path to the SQLite database (overrides EVENTBOOK_DB)
    #[arg(long)]
    db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventbook=info,tower_http=debug".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = EventbookConfig::from_env()?.with_overrides(cli.bind, cli.db)?;

    let store = SqliteEventStore::open(&config.db_path)
        .with_context(|| format!("opening database {}", config.db_path.display()))?;
    let state = Arc::new(AppState::new(Arc::new(store), Arc::new(SystemClock)));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    tracing::info!("eventbook listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("eventbook shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
