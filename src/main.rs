use std::sync::Arc;

use anyhow::Context;
use chat_relay::{config::RelayConfig, routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,chat_relay=debug,tower_http=debug".into()),
        )
        .with_target(false)
        .init();

    let config = RelayConfig::from_env()?;
    if config.backend_url.is_none() {
        tracing::warn!("BACKEND_URL is not set; /chat will fail until it is configured");
    }
    let addr = config.bind_addr;

    let state = Arc::new(AppState::new(config).context("failed to build upstream client")?);
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("chat relay listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
