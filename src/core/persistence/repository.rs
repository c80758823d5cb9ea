// src/core/persistence/repository.rs

//! Reads and writes the server's data directory.
//!
//! Layout under `data_dir`:
//! - the accounts file: JSON lines, one `Account` per line, appended on register;
//! - the songs file: JSON lines of `{ "name", "artist", "file" }`, maintained by hand;
//! - the profiles directory: one pretty-printed JSON `Profile` per user.
//!
//! Writes go straight to the file with no fsync. A failed write is reported to
//! the caller, which logs it; the in-memory state stays authoritative.

use crate::config::StorageConfig;
use crate::core::TunecastError;
use crate::core::storage::{Account, Profile, Song, SongSource};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One entry of the song index.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SongRecord {
    pub name: String,
    pub artist: String,
    /// Audio file name, relative to the songs directory.
    pub file: String,
}

#[derive(Debug, Clone)]
pub struct Repository {
    accounts_path: PathBuf,
    songs_path: PathBuf,
    profiles_dir: PathBuf,
    songs_dir: PathBuf,
}

impl Repository {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            accounts_path: config.accounts_path(),
            songs_path: config.songs_path(),
            profiles_dir: config.profiles_path(),
            songs_dir: PathBuf::from(&config.songs_dir),
        }
    }

    pub fn load_accounts(&self) -> Vec<Account> {
        read_json_lines(&self.accounts_path)
    }

    /// Loads the song index, resolving each file against the songs directory.
    pub fn load_songs(&self) -> Vec<Song> {
        read_json_lines::<SongRecord>(&self.songs_path)
            .into_iter()
            .map(|record| {
                let path = self.songs_dir.join(&record.file);
                Song::new(&record.name, &record.artist, SongSource::File(path))
            })
            .collect()
    }

    /// Loads the stored profile of every given user. Users without a readable
    /// profile file are skipped with a warning.
    pub fn load_profiles<'a>(&self, usernames: impl IntoIterator<Item = &'a str>) -> Vec<Profile> {
        let mut profiles = Vec::new();
        for username in usernames {
            let path = self.profile_path(username);
            match fs::read_to_string(&path) {
                Ok(contents) => match serde_json::from_str::<Profile>(&contents) {
                    Ok(profile) => profiles.push(profile),
                    Err(e) => warn!("Profile file {} is malformed: {}", path.display(), e),
                },
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    warn!("Unable to find the profile file of {}.", username);
                }
                Err(e) => warn!("Problem with the profile file {}: {}", path.display(), e),
            }
        }
        profiles
    }

    pub fn append_account(&self, account: &Account) -> Result<(), TunecastError> {
        ensure_parent(&self.accounts_path)?;
        let mut line = serde_json::to_string(account)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.accounts_path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    pub fn save_profile(&self, profile: &Profile) -> Result<(), TunecastError> {
        fs::create_dir_all(&self.profiles_dir)?;
        let contents = serde_json::to_string_pretty(profile)?;
        fs::write(self.profile_path(&profile.username), contents)?;
        debug!("Saved profile of {}.", profile.username);
        Ok(())
    }

    fn profile_path(&self, username: &str) -> PathBuf {
        self.profiles_dir.join(format!("{username}.json"))
    }
}

fn ensure_parent(path: &Path) -> Result<(), TunecastError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Reads a JSON-lines file. A missing file reads as empty; malformed lines
/// are skipped with a warning.
fn read_json_lines<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Unable to find {}; starting with no entries.", path.display());
            return Vec::new();
        }
        Err(e) => {
            warn!("Problem with {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match serde_json::from_str(line) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Skipping line {} of {}: {}", index + 1, path.display(), e);
                None
            }
        })
        .collect()
}
