//! Groupgate Service - subscription-gated group access bot
//!
//! This is the main entry point for the groupgate service.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use groupgate_service::{create_router, AppState, ExpirySweeper, ServiceConfig};
use groupgate_store::RocksStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,groupgate=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting groupgate service");

    // Load configuration from environment
    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Configuration is incomplete");
            return Err(e.into());
        }
    };

    tracing::info!(
        listen_addr = %config.listen_addr,
        data_dir = %config.data_dir,
        group_chat_id = config.group_chat_id,
        sweep_interval_secs = config.sweep_interval_secs,
        sample_photos = config.sample_photo_ids.len(),
        "Service configuration loaded"
    );

    // Initialize RocksDB store
    tracing::info!(path = %config.data_dir, "Opening RocksDB store");
    let store = Arc::new(RocksStore::open(&config.data_dir)?);

    // Build app state
    let state = AppState::new(Arc::clone(&store), config.clone());

    // (Re)register the bot-update webhook. Best effort: the platform keeps
    // any previous registration if this fails, and updates still flow.
    if let Err(e) = state.telegram.delete_webhook(true).await {
        tracing::warn!(error = %e, "Webhook deregistration failed");
    }
    match state.telegram.set_webhook(&config.telegram_webhook_url()).await {
        Ok(()) => tracing::info!("Bot webhook registered"),
        Err(e) => tracing::warn!(error = %e, "Bot webhook registration failed"),
    }

    // Start the expiry sweeper
    let shutdown = CancellationToken::new();
    let sweeper = ExpirySweeper::new(
        store,
        state.access.clone(),
        Duration::from_secs(config.sweep_interval_secs),
        shutdown.clone(),
    );
    let sweeper_handle = tokio::spawn(sweeper.run());

    // Create the router
    let app = create_router(state);

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop and join the sweeper before exiting
    shutdown.cancel();
    if let Err(e) = sweeper_handle.await {
        tracing::warn!(error = %e, "Sweeper task did not shut down cleanly");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
