// src/connection/mod.rs

//! Manages a single client TCP connection: reading and parsing command lines,
//! routing them, writing replies, and pumping an active audio stream.

mod handler;
mod playback;
mod session;

pub use handler::{ConnectionHandler, Liveness};
pub use playback::Playback;
pub use session::{SessionPhase, SessionState};
