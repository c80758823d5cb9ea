// src/core/handler/actions/mod.rs

// The router reaches them as `actions::module::function`.
pub mod account;
pub mod catalog;
pub mod connection;
pub mod playback;
pub mod playlist;
