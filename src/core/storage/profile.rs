// src/core/storage/profile.rs

//! User profiles and their playlists.

use crate::core::TunecastError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The reply for a playlist that exists but holds nothing.
pub const EMPTY_PLAYLIST: &str = "There are no songs.";

/// A named, insertion-ordered list of songs. A song name appears at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub name: String,
    /// Song name to artist.
    pub songs: IndexMap<String, String>,
}

impl Playlist {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            songs: IndexMap::new(),
        }
    }

    pub fn add(&mut self, song: &str, artist: &str) -> Result<(), TunecastError> {
        if self.songs.contains_key(song) {
            return Err(TunecastError::SongAlreadyInPlaylist(self.name.clone()));
        }
        self.songs.insert(song.to_string(), artist.to_string());
        Ok(())
    }

    /// One `song - artist` line per song, or the empty-playlist text.
    pub fn show(&self) -> String {
        if self.songs.is_empty() {
            return EMPTY_PLAYLIST.to_string();
        }
        self.songs
            .iter()
            .map(|(song, artist)| format!("{song} - {artist}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    #[serde(default)]
    pub playlists: IndexMap<String, Playlist>,
}

impl Profile {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            playlists: IndexMap::new(),
        }
    }

    pub fn add_playlist(&mut self, name: &str) -> Result<(), TunecastError> {
        if name.trim().is_empty() {
            return Err(TunecastError::BlankName);
        }
        if self.playlists.contains_key(name) {
            return Err(TunecastError::PlaylistExists);
        }
        self.playlists.insert(name.to_string(), Playlist::new(name));
        Ok(())
    }

    pub fn add_song(&mut self, playlist: &str, song: &str, artist: &str) -> Result<(), TunecastError> {
        self.playlists
            .get_mut(playlist)
            .ok_or(TunecastError::PlaylistNotFound)?
            .add(song, artist)
    }

    pub fn show_playlist(&self, name: &str) -> Result<String, TunecastError> {
        self.playlists
            .get(name)
            .map(Playlist::show)
            .ok_or(TunecastError::PlaylistNotFound)
    }
}

/// All loaded profiles, keyed by username.
#[derive(Debug, Default)]
pub struct ProfileStore {
    profiles: HashMap<String, Profile>,
}

impl ProfileStore {
    pub fn new(profiles: impl IntoIterator<Item = Profile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|profile| (profile.username.clone(), profile))
                .collect(),
        }
    }

    pub fn get(&self, username: &str) -> Option<&Profile> {
        self.profiles.get(username)
    }

    pub fn get_mut(&mut self, username: &str) -> Option<&mut Profile> {
        self.profiles.get_mut(username)
    }

    /// Returns the user's profile, creating an empty one if none was stored.
    pub fn get_or_create(&mut self, username: &str) -> &mut Profile {
        self.profiles
            .entry(username.to_string())
            .or_insert_with(|| Profile::new(username))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
