// src/core/handler/actions/catalog.rs

use crate::core::TunecastError;
use crate::core::handler::command_router::RouteResponse;
use crate::core::state::ServerState;

pub fn handle_search(args: &[String], state: &ServerState) -> Result<RouteResponse, TunecastError> {
    Ok(RouteResponse::Single(state.catalog.search(args)))
}

pub fn handle_top(args: &[String], state: &ServerState) -> Result<RouteResponse, TunecastError> {
    let n: i64 = args[0].parse().map_err(|_| TunecastError::NotANumber)?;
    state.catalog.top(n).map(RouteResponse::Single)
}
