// src/core/state/mod.rs

//! Defines the central `ServerState` struct and the state components it owns.
//! The whole tree is owned by the connection loop and mutated only from it.

mod client;
mod core;
mod sessions;
mod stats;

pub use client::{ClientInfo, ConnectionId};
pub use core::ServerState;
pub use sessions::SessionRegistry;
pub use stats::StatsState;
