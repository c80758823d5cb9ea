// src/core/storage/catalog.rs

//! The song catalog: what can be searched, ranked and played, and how many
//! listeners each song has right now.

use crate::core::TunecastError;
use crate::core::audio::{AudioSource, AudioStream, PcmClip, WavStream};
use indexmap::IndexMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

pub const NO_SEARCH_MATCH: &str =
    "There is no song that contains these words in its name and artist";
pub const NO_ACTIVE_LISTENERS: &str = "No songs are currently being listened to.";

/// Identifies a song by name and artist.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SongKey {
    pub name: String,
    pub artist: String,
}

impl SongKey {
    pub fn new(name: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
        }
    }
}

impl fmt::Display for SongKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.artist)
    }
}

/// Where a song's audio comes from.
#[derive(Debug, Clone)]
pub enum SongSource {
    /// A WAV file on disk.
    File(PathBuf),
    /// PCM audio held in memory.
    Clip(PcmClip),
    /// Any other source, e.g. a generated or decoded stream.
    Custom(Arc<dyn AudioSource>),
}

impl SongSource {
    fn open(&self) -> Result<Box<dyn AudioStream>, TunecastError> {
        match self {
            SongSource::File(path) => Ok(Box::new(WavStream::open(path)?)),
            SongSource::Clip(clip) => clip.open(),
            SongSource::Custom(source) => source.open(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Song {
    pub key: SongKey,
    pub source: SongSource,
    listeners: u64,
}

impl Song {
    pub fn new(name: &str, artist: &str, source: SongSource) -> Self {
        Self {
            key: SongKey::new(name, artist),
            source,
            listeners: 0,
        }
    }

    pub fn listeners(&self) -> u64 {
        self.listeners
    }

    /// True when every word occurs, ignoring case, in the name or the artist.
    fn matches_all(&self, words: &[String]) -> bool {
        let name = self.key.name.to_lowercase();
        let artist = self.key.artist.to_lowercase();
        words.iter().all(|word| {
            let word = word.to_lowercase();
            name.contains(&word) || artist.contains(&word)
        })
    }
}

#[derive(Debug, Default)]
pub struct SongCatalog {
    songs: IndexMap<SongKey, Song>,
}

impl SongCatalog {
    pub fn new(songs: impl IntoIterator<Item = Song>) -> Self {
        let mut catalog = Self::default();
        for song in songs {
            catalog.insert(song);
        }
        catalog
    }

    /// Adds a song, replacing any entry with the same name and artist.
    pub fn insert(&mut self, song: Song) {
        self.songs.insert(song.key.clone(), song);
    }

    pub fn exists(&self, key: &SongKey) -> bool {
        self.songs.contains_key(key)
    }

    pub fn listeners(&self, key: &SongKey) -> Option<u64> {
        self.songs.get(key).map(Song::listeners)
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Songs matching every word, one `name - artist` per line in catalog order.
    pub fn search(&self, words: &[String]) -> String {
        let lines: Vec<String> = self
            .songs
            .values()
            .filter(|song| song.matches_all(words))
            .map(|song| song.key.to_string())
            .collect();
        if lines.is_empty() {
            NO_SEARCH_MATCH.to_string()
        } else {
            lines.join("\n")
        }
    }

    /// Up to `n` songs that currently have listeners, most listened first.
    /// Songs with equal counts keep catalog order.
    pub fn top(&self, n: i64) -> Result<String, TunecastError> {
        if n < 0 {
            return Err(TunecastError::NegativeNumber);
        }
        let mut active: Vec<&Song> = self.songs.values().filter(|s| s.listeners > 0).collect();
        active.sort_by(|a, b| b.listeners.cmp(&a.listeners));
        let lines: Vec<String> = active
            .into_iter()
            .take(usize::try_from(n).unwrap_or(usize::MAX))
            .map(|song| song.key.to_string())
            .collect();
        if lines.is_empty() {
            Ok(NO_ACTIVE_LISTENERS.to_string())
        } else {
            Ok(lines.join("\n"))
        }
    }

    /// Opens the song's audio and counts a new listener. The counter only moves
    /// once the source opened successfully.
    pub fn play(&mut self, key: &SongKey) -> Result<Box<dyn AudioStream>, TunecastError> {
        let song = self.songs.get_mut(key).ok_or(TunecastError::SongNotFound)?;
        let stream = song.source.open()?;
        song.listeners += 1;
        Ok(stream)
    }

    /// Takes back the listener counted by `play`.
    pub fn stop(&mut self, key: &SongKey) -> Result<(), TunecastError> {
        let song = self.songs.get_mut(key).ok_or(TunecastError::SongNotFound)?;
        song.listeners = song.listeners.saturating_sub(1);
        Ok(())
    }
}
