use anyhow::Context;
use clap::Parser;
use std::future::IntoFuture;

use courtside::{config::Config, routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| "courtside=info,tower_http=warn".into()),
        )
        .init();

    // The registry lives here and is handed to every route through AppState
    let state = AppState::new(config.poll_interval());
    tracing::info!(
        poll_interval_secs = config.poll_interval_secs,
        "Game registry initialized"
    );

    let app = routes::router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server listening on http://{}", addr);

    // Open score streams never drain, so exit on ctrl-c instead of a graceful shutdown
    tokio::select! {
        result = axum::serve(listener, app).into_future() => result.context("Server error")?,
        _ = tokio::signal::ctrl_c() => tracing::info!("Shutdown signal received"),
    }

    tracing::info!("Shutting down score server");
    Ok(())
}
