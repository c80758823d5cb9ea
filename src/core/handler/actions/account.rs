// src/core/handler/actions/account.rs

use crate::connection::SessionState;
use crate::core::TunecastError;
use crate::core::handler::command_router::RouteResponse;
use crate::core::state::{ConnectionId, ServerState};
use crate::core::storage::Profile;
use tracing::{error, info};

pub const REGISTERED: &str = "You have successfully registered!";
pub const LOGGED_IN: &str = "You have successfully logged in";

/// Creates an account and an empty profile, and writes both to disk. Does not
/// log the client in.
pub fn handle_register(
    args: &[String],
    session: &SessionState,
    state: &mut ServerState,
) -> Result<RouteResponse, TunecastError> {
    if session.is_authenticated() {
        return Err(TunecastError::RegisterWhileLoggedIn);
    }
    let (email, password) = (&args[0], &args[1]);

    let account = state.accounts.register(email, password)?.clone();
    info!("Registered new user {}.", email);

    if let Err(e) = state.repository.append_account(&account) {
        error!("Failed to save the account of {}: {}", email, e);
    }
    *state.profiles.get_or_create(email) = Profile::new(email);
    state.persist_profile(email);

    Ok(RouteResponse::Single(REGISTERED.to_string()))
}

/// Binds the connection to a user. A user can be logged in on one connection
/// at a time, and a connection can hold one login.
pub fn handle_login(
    args: &[String],
    session: &mut SessionState,
    state: &mut ServerState,
    conn_id: ConnectionId,
) -> Result<RouteResponse, TunecastError> {
    let (email, password) = (&args[0], &args[1]);
    if session.is_authenticated() || state.sessions.is_active(email) {
        return Err(TunecastError::AlreadyLoggedIn);
    }
    if !state.accounts.login(email, password)? {
        return Err(TunecastError::WrongPassword);
    }

    state.sessions.activate(email, conn_id);
    state.profiles.get_or_create(email);
    session.user = Some(email.clone());
    info!("User {} logged in on connection {}.", email, conn_id);

    Ok(RouteResponse::Single(LOGGED_IN.to_string()))
}
