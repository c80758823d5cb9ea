// src/core/handler/actions/connection.rs

use crate::connection::SessionState;
use crate::core::TunecastError;
use crate::core::handler::command_router::RouteResponse;
use crate::core::state::{ConnectionId, ServerState};
use tracing::info;

pub const DISCONNECTED: &str = "You have successfully disconnected!";

/// Ends the session: stops any stream, logs the user out, and asks the
/// connection to close after the reply. Valid from any state.
pub fn handle_disconnect(
    session: &mut SessionState,
    state: &mut ServerState,
    conn_id: ConnectionId,
) -> Result<RouteResponse, TunecastError> {
    if let Some(playback) = session.playback.as_mut()
        && !playback.is_cancelled()
    {
        playback.cancel();
        let song = playback.song().clone();
        state.release_listen(&song);
    }
    if let Some(user) = session.user.take() {
        state.sessions.release(&user, conn_id);
        info!("User {} disconnected.", user);
    }
    Ok(RouteResponse::Close(DISCONNECTED.to_string()))
}
