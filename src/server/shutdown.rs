// src/server/shutdown.rs

//! The one object that crosses threads: a handle that tells the loop to stop.

use std::sync::Arc;
use tokio::sync::watch;

/// Stops a running server. Cheap to clone and safe to call from any thread or
/// signal handler; stopping twice is the same as stopping once.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    /// Creates a handle and the receiver the loop waits on.
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { tx: Arc::new(tx) }, rx)
    }

    /// Wakes the loop and makes it exit at its next iteration.
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }
}
