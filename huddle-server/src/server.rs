use crate::config::ServerConfig;
use crate::room::RoomManager;
use crate::signaling::router;
use crate::store::open_store;
use anyhow::{Context, Result};
use std::future::Future;
use tracing::info;

/// Restores persisted rooms and serves the HTTP API until `shutdown` resolves.
pub async fn run(config: ServerConfig, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
    let store = open_store(&config)
        .await
        .context("Failed to open room store")?;
    let rooms = RoomManager::restore(store, config.room)
        .await
        .context("Failed to restore rooms")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    match &config.data_dir {
        Some(dir) => info!("Persisting rooms to {}", dir.display()),
        None => info!("Keeping rooms in memory only"),
    }
    info!("Signaling server listening on http://{}", config.bind_addr);

    axum::serve(listener, router(rooms))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")?;

    info!("Signaling server stopped");
    Ok(())
}
