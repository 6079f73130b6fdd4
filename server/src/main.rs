//! CoinConv Server Binary
//!
//! Serves currency conversions priced from live exchange rates.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coinconv_server::{router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting CoinConv server");

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    let state = Arc::new(AppState::from_config(&config));

    info!(
        sources = ?state.resolver.registry().ids().collect::<Vec<_>>(),
        intermediaries = ?config.resolver.intermediaries,
        retention_seconds = config.cache.retention.as_secs(),
        "Resolver ready"
    );

    // Sweep expired cache records
    let sweeper_state = state.clone();
    let sweep_interval = config.cache_sweep_interval;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        loop {
            ticker.tick().await;
            let evicted = sweeper_state.store.evict_expired();
            if evicted > 0 {
                tracing::debug!(evicted, "Evicted expired cache records");
            }
        }
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;

    info!(
        listen_addr = %config.listen_addr,
        listen_port = %config.listen_port,
        "Server running"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
