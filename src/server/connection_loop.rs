// src/server/connection_loop.rs

//! The event loop: accepts connections, waits for any of them to become
//! ready, and gives every connection one turn per wake-up.
//!
//! Everything runs in this single task. Connections, their sessions and the
//! server state are owned here and lent to one connection at a time.

use super::context::ServerContext;
use super::shutdown::ShutdownHandle;
use crate::connection::{ConnectionHandler, Liveness};
use crate::core::state::{ClientInfo, ConnectionId, ServerState};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::collections::BTreeMap;
use std::io;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Why the loop woke up.
enum Wake {
    Shutdown,
    Accepted(io::Result<(TcpStream, SocketAddr)>),
    Ready,
}

pub struct ConnectionLoop {
    state: ServerState,
    listener: TcpListener,
    shutdown_rx: watch::Receiver<bool>,
    /// Held so the shutdown channel stays open for the loop's lifetime.
    _shutdown: ShutdownHandle,
    connections: BTreeMap<ConnectionId, ConnectionHandler>,
    next_id: u64,
}

impl ConnectionLoop {
    pub fn new(ctx: ServerContext) -> Self {
        Self {
            state: ctx.state,
            listener: ctx.listener,
            shutdown_rx: ctx.shutdown_rx,
            _shutdown: ctx.shutdown,
            connections: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Runs until the shutdown handle fires, then closes every connection and
    /// hands back the final server state.
    pub async fn run(mut self) -> ServerState {
        loop {
            if *self.shutdown_rx.borrow() {
                break;
            }
            match self.wait().await {
                Wake::Shutdown => break,
                Wake::Accepted(Ok((socket, addr))) => self.register(socket, addr),
                Wake::Accepted(Err(e)) => error!("Failed to accept connection: {}", e),
                Wake::Ready => {}
            }
            self.sweep();
        }

        info!(
            "Shutting down. Closing {} open connections.",
            self.connections.len()
        );
        let connections = std::mem::take(&mut self.connections);
        for (_, mut conn) in connections {
            conn.teardown(&mut self.state);
        }
        drop(self.listener);

        let stats = &self.state.stats;
        info!(
            "Server shutdown complete. Served {} connections, {} commands and {} streams ({} audio bytes).",
            stats.get_total_connections(),
            stats.get_total_commands(),
            stats.get_total_streams(),
            stats.get_audio_bytes_sent()
        );
        self.state
    }

    /// Blocks until the stop signal fires, a client connects, or at least one
    /// connection is ready for its interest.
    async fn wait(&mut self) -> Wake {
        let mut readiness: FuturesUnordered<_> = self
            .connections
            .values()
            .map(ConnectionHandler::ready)
            .collect();

        tokio::select! {
            biased;
            _ = self.shutdown_rx.changed() => Wake::Shutdown,
            res = self.listener.accept() => Wake::Accepted(res),
            Some(_) = readiness.next(), if !readiness.is_empty() => Wake::Ready,
        }
    }

    fn register(&mut self, socket: TcpStream, addr: SocketAddr) {
        self.next_id += 1;
        let id = ConnectionId(self.next_id);
        if let Err(e) = socket.set_nodelay(true) {
            debug!("Could not disable Nagle for {}: {}", addr, e);
        }
        self.state.stats.increment_total_connections();
        self.state.clients.insert(id, ClientInfo::new(id, addr));
        self.connections
            .insert(id, ConnectionHandler::new(socket, addr, id, &self.state.config));
        info!("Accepted new connection {} from {}", id, addr);
    }

    /// Gives every connection one turn, in connection order, and drops the
    /// ones that closed.
    fn sweep(&mut self) {
        let ids: Vec<ConnectionId> = self.connections.keys().copied().collect();
        for id in ids {
            let Some(conn) = self.connections.get_mut(&id) else {
                continue;
            };
            if conn.turn(&mut self.state) == Liveness::Closed
                && let Some(mut conn) = self.connections.remove(&id)
            {
                conn.teardown(&mut self.state);
                info!("Connection {} from {} closed.", id, conn.addr());
            }
        }
    }
}
