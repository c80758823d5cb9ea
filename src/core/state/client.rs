// src/core/state/client.rs

//! Contains state definitions related to client connections.

use std::fmt;
use std::net::SocketAddr;
use std::time::Instant;

/// Opaque identifier of an accepted connection. Ids are handed out in
/// increasing order and never reused while the server runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct ClientInfo {
    pub id: ConnectionId,
    pub addr: SocketAddr,
    pub created: Instant,
    pub last_command_time: Instant,
}

impl ClientInfo {
    pub fn new(id: ConnectionId, addr: SocketAddr) -> Self {
        let now = Instant::now();
        Self {
            id,
            addr,
            created: now,
            last_command_time: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_command_time = Instant::now();
    }
}
