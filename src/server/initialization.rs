// src/server/initialization.rs

//! Handles server initialization: loading the data directory into memory and
//! binding the listener.

use super::context::ServerContext;
use super::shutdown::ShutdownHandle;
use crate::config::Config;
use crate::core::state::ServerState;
use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Initializes all server components before starting the main loop. A bind
/// failure is returned to the caller.
pub async fn setup(config: Config) -> Result<ServerContext> {
    log_startup_info(&config);

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    let local_addr = listener.local_addr()?;

    let state = ServerState::initialize(config);
    if state.catalog.is_empty() {
        warn!("The song catalog is empty; `play` will find nothing.");
    }
    info!("Tunecast server listening on {}", local_addr);

    let (shutdown, shutdown_rx) = ShutdownHandle::new();
    Ok(ServerContext {
        state,
        listener,
        shutdown,
        shutdown_rx,
    })
}

/// Logs key configuration parameters at startup.
fn log_startup_info(config: &Config) {
    info!(
        "Data directory: '{}', songs directory: '{}'.",
        config.storage.data_dir, config.storage.songs_dir
    );
    info!(
        "Reading at most {} bytes per connection per turn; lines are capped at {} bytes.",
        config.connection.read_buffer_size, config.connection.max_line_length
    );
    info!(
        "Streaming at most {} frames per connection per turn.",
        config.stream.frames_per_turn
    );
}
