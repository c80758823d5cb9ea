// src/core/handler/actions/playlist.rs

//! Playlist commands. Each mutation rewrites the user's profile file.

use crate::connection::SessionState;
use crate::core::TunecastError;
use crate::core::handler::command_router::RouteResponse;
use crate::core::state::ServerState;
use crate::core::storage::{Profile, SongKey};

fn current_user(session: &SessionState) -> Result<&str, TunecastError> {
    session.user().ok_or(TunecastError::AuthRequired)
}

fn profile_of<'s>(state: &'s mut ServerState, user: &str) -> &'s mut Profile {
    state.profiles.get_or_create(user)
}

pub fn handle_create_playlist(
    args: &[String],
    session: &SessionState,
    state: &mut ServerState,
) -> Result<RouteResponse, TunecastError> {
    let user = current_user(session)?;
    let name = &args[0];
    profile_of(state, user).add_playlist(name)?;
    state.persist_profile(user);
    Ok(RouteResponse::Single(format!(
        "A playlist with a name {name} created successfully!"
    )))
}

/// Adds a catalog song to one of the user's playlists.
pub fn handle_add_song_to(
    args: &[String],
    session: &SessionState,
    state: &mut ServerState,
) -> Result<RouteResponse, TunecastError> {
    let user = current_user(session)?;
    let (playlist, song, artist) = (&args[0], &args[1], &args[2]);
    if !state.catalog.exists(&SongKey::new(song.as_str(), artist.as_str())) {
        return Err(TunecastError::SongNotFound);
    }
    profile_of(state, user).add_song(playlist, song, artist)?;
    state.persist_profile(user);
    Ok(RouteResponse::Single(format!(
        "You have successfully added new song in playlist {playlist}!"
    )))
}

pub fn handle_show_playlist(
    args: &[String],
    session: &SessionState,
    state: &mut ServerState,
) -> Result<RouteResponse, TunecastError> {
    let user = current_user(session)?;
    profile_of(state, user)
        .show_playlist(&args[0])
        .map(RouteResponse::Single)
}
