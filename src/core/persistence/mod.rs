// src/core/persistence/mod.rs

pub mod repository;

pub use repository::Repository;
