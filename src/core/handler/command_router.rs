// src/core/handler/command_router.rs

//! The central component for routing parsed commands to their handlers.
//!
//! Every command goes through the same gates, in order: the name must be
//! known, the argument count must match (checked before any state is looked
//! at, so even an anonymous client gets the usage text), and commands that
//! need a login must have one. Only then is the action run.

use super::actions;
use crate::connection::SessionState;
use crate::core::commands::CommandKind;
use crate::core::state::{ConnectionId, ServerState};
use crate::core::{Command, TunecastError};
use std::net::SocketAddr;
use tracing::debug_span;

/// What the connection handler should do with a command's result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteResponse {
    /// One text reply.
    Single(String),
    /// A stream was installed on the session. `header` is the format
    /// descriptor; the frames follow on later turns.
    StartStream { header: String },
    /// Send the reply, then close the connection.
    Close(String),
}

/// The `Router` receives a parsed `Command` and directs it to its action.
pub struct Router<'a> {
    state: &'a mut ServerState,
    conn_id: ConnectionId,
    addr: SocketAddr,
    session: &'a mut SessionState,
}

impl<'a> Router<'a> {
    pub fn new(
        state: &'a mut ServerState,
        conn_id: ConnectionId,
        addr: SocketAddr,
        session: &'a mut SessionState,
    ) -> Self {
        Self {
            state,
            conn_id,
            addr,
            session,
        }
    }

    /// The main entry point for routing a command.
    pub fn route(&mut self, command: Command) -> Result<RouteResponse, TunecastError> {
        let _span = debug_span!(
            "command",
            name = %command.name(),
            client.addr = %self.addr,
            client.id = %self.conn_id,
        )
        .entered();

        let kind = command
            .kind()
            .ok_or_else(|| TunecastError::UnknownCommand(command.name().to_string()))?;
        kind.validate_arg_count(command.args())?;
        if kind.requires_auth() && !self.session.is_authenticated() {
            return Err(TunecastError::AuthRequired);
        }

        let args = command.args();
        match kind {
            CommandKind::Register => actions::account::handle_register(args, self.session, self.state),
            CommandKind::Login => {
                actions::account::handle_login(args, self.session, self.state, self.conn_id)
            }
            CommandKind::Search => actions::catalog::handle_search(args, self.state),
            CommandKind::Top => actions::catalog::handle_top(args, self.state),
            CommandKind::CreatePlaylist => {
                actions::playlist::handle_create_playlist(args, self.session, self.state)
            }
            CommandKind::AddSongTo => {
                actions::playlist::handle_add_song_to(args, self.session, self.state)
            }
            CommandKind::ShowPlaylist => {
                actions::playlist::handle_show_playlist(args, self.session, self.state)
            }
            CommandKind::Play => actions::playback::handle_play(args, self.session, self.state),
            CommandKind::Stop => actions::playback::handle_stop(self.session, self.state),
            CommandKind::Disconnect => {
                actions::connection::handle_disconnect(self.session, self.state, self.conn_id)
            }
        }
    }
}
