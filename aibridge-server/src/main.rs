//! aibridge-server
//!
//! HTTP service for the NEAR AI bridge agent.

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aibridge_common::BridgeConfig;
use aibridge_server::{app_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the process environment still applies.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aibridge_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = BridgeConfig::from_env()?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let state = AppState::new(config)?;
    // Executors answer 503 until this completes.
    tokio::spawn({
        let state = state.clone();
        async move { state.initialize().await }
    });

    tracing::info!("NEAR AI bridge agent listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app_router(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install CTRL+C signal handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
