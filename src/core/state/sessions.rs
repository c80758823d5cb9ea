// src/core/state/sessions.rs

//! Tracks which users are logged in, and on which connection.

use super::client::ConnectionId;
use std::collections::HashMap;

/// Maps a logged-in user to the connection holding their session. A user can
/// be active on at most one connection at a time.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    active: HashMap<String, ConnectionId>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, user: &str) -> bool {
        self.active.contains_key(user)
    }

    /// Marks `user` as logged in on `conn`. Returns `false`, leaving the
    /// existing session in place, when the user is already active.
    pub fn activate(&mut self, user: &str, conn: ConnectionId) -> bool {
        if self.active.contains_key(user) {
            return false;
        }
        self.active.insert(user.to_string(), conn);
        true
    }

    /// Drops the user's session if `conn` is the connection that owns it.
    pub fn release(&mut self, user: &str, conn: ConnectionId) -> bool {
        if self.active.get(user) == Some(&conn) {
            self.active.remove(user);
            true
        } else {
            false
        }
    }

    pub fn owner(&self, user: &str) -> Option<ConnectionId> {
        self.active.get(user).copied()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
