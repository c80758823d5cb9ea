// src/server/context.rs

use super::shutdown::ShutdownHandle;
use crate::core::state::ServerState;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Holds all the initialized state required to run the server's main loop.
pub struct ServerContext {
    pub state: ServerState,
    pub listener: TcpListener,
    pub shutdown: ShutdownHandle,
    pub shutdown_rx: watch::Receiver<bool>,
}
