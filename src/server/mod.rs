// src/server/mod.rs

use crate::config::Config;
use crate::core::state::ServerState;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::signal::unix::{SignalKind, signal};
use tracing::info;

mod connection_loop;
mod context;
mod initialization;
mod shutdown;

pub use connection_loop::ConnectionLoop;
pub use context::ServerContext;
pub use shutdown::ShutdownHandle;

/// A bound, not yet running server.
pub struct Server {
    ctx: ServerContext,
}

impl Server {
    /// Loads the data directory and binds the listener.
    pub async fn bind(config: Config) -> Result<Self> {
        Ok(Self {
            ctx: initialization::setup(config).await?,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.ctx.listener.local_addr()?)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.ctx.shutdown.clone()
    }

    /// The state the loop will start with, e.g. to add in-memory songs.
    pub fn state_mut(&mut self) -> &mut ServerState {
        &mut self.ctx.state
    }

    /// Serves clients until the shutdown handle fires.
    pub async fn run(self) -> ServerState {
        ConnectionLoop::new(self.ctx).run().await
    }
}

/// The main server startup function: binds, wires SIGINT/SIGTERM to a
/// graceful stop, and serves until then.
pub async fn run(config: Config) -> Result<()> {
    let server = Server::bind(config).await?;
    spawn_signal_watcher(server.shutdown_handle())?;
    server.run().await;
    Ok(())
}

fn spawn_signal_watcher(handle: ShutdownHandle) -> Result<()> {
    let mut sigint =
        signal(SignalKind::interrupt()).context("Failed to register SIGINT handler")?;
    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to register SIGTERM handler")?;
    tokio::spawn(async move {
        tokio::select! {
            _ = sigint.recv() => info!("SIGINT received, initiating graceful shutdown."),
            _ = sigterm.recv() => info!("SIGTERM received, initiating graceful shutdown."),
        }
        handle.stop();
    });
    Ok(())
}
