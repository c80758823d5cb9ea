// src/core/storage/mod.rs

//! In-memory stores the command handlers work against: accounts, user
//! profiles with their playlists, and the song catalog.

pub mod accounts;
pub mod catalog;
pub mod profile;

pub use accounts::{Account, AccountStore};
pub use catalog::{Song, SongCatalog, SongKey, SongSource};
pub use profile::{Playlist, Profile, ProfileStore};
