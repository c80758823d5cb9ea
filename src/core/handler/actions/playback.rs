// src/core/handler/actions/playback.rs

use crate::connection::{Playback, SessionState};
use crate::core::TunecastError;
use crate::core::handler::command_router::RouteResponse;
use crate::core::state::ServerState;
use crate::core::storage::SongKey;
use tracing::info;

pub const STOPPED: &str = "You stopped the song successfully!";

/// Opens the song and installs a playback on the session. Frames are written
/// by the connection on the following turns.
pub fn handle_play(
    args: &[String],
    session: &mut SessionState,
    state: &mut ServerState,
) -> Result<RouteResponse, TunecastError> {
    if session.is_streaming() {
        return Err(TunecastError::AlreadyStreaming);
    }
    let key = SongKey::new(args[0].as_str(), args[1].as_str());
    let stream = state.catalog.play(&key)?;
    let playback = Playback::new(key, stream);
    let header = playback.descriptor();

    info!("Started streaming {}.", playback.song());
    state.stats.increment_total_streams();
    session.playback = Some(playback);
    Ok(RouteResponse::StartStream { header })
}

/// Cancels the active stream. The connection writes the end marker before
/// this reply.
pub fn handle_stop(
    session: &mut SessionState,
    state: &mut ServerState,
) -> Result<RouteResponse, TunecastError> {
    let playback = session
        .playback
        .as_mut()
        .filter(|p| !p.is_cancelled())
        .ok_or(TunecastError::NotStreaming)?;
    playback.cancel();
    let song = playback.song().clone();
    state
        .catalog
        .stop(&song)
        .map_err(|_| TunecastError::StreamedSongMissing(song.name.clone()))?;
    info!("Stopped streaming {}.", song);
    Ok(RouteResponse::Single(STOPPED.to_string()))
}
