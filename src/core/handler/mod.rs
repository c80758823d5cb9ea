// src/core/handler/mod.rs

mod actions;

pub mod command_router;
