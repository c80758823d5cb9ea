// src/connection/session.rs

//! Defines the state associated with a single client session.

use super::playback::Playback;

/// Where a connection stands in the login/streaming lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Anonymous,
    Authenticated,
    Streaming,
}

/// Holds the state specific to a single client session.
#[derive(Debug, Default)]
pub struct SessionState {
    /// The email of the logged-in user. It keys both the session registry and
    /// the profile store.
    pub user: Option<String>,
    /// The song being streamed, if any.
    pub playback: Option<Playback>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.user, &self.playback) {
            (None, _) => SessionPhase::Anonymous,
            (Some(_), None) => SessionPhase::Authenticated,
            (Some(_), Some(_)) => SessionPhase::Streaming,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_streaming(&self) -> bool {
        self.playback.is_some()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }
}
