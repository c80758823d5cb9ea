// src/config.rs

//! Manages server configuration: loading from TOML, defaults, and validation.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Where the server keeps its data on disk.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding the account list, the song index and the profiles.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Directory that audio file names in the song index are relative to.
    #[serde(default = "default_songs_dir")]
    pub songs_dir: String,
    #[serde(default = "default_accounts_file")]
    pub accounts_file: String,
    #[serde(default = "default_songs_file")]
    pub songs_file: String,
    /// Subdirectory of `data_dir` with one JSON file per user.
    #[serde(default = "default_profiles_dir")]
    pub profiles_dir: String,
    /// Operator log under `data_dir` keeping warnings and errors across
    /// restarts. An empty name turns it off.
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            songs_dir: default_songs_dir(),
            accounts_file: default_accounts_file(),
            songs_file: default_songs_file(),
            profiles_dir: default_profiles_dir(),
            log_file: default_log_file(),
        }
    }
}

impl StorageConfig {
    pub fn accounts_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.accounts_file)
    }

    pub fn songs_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.songs_file)
    }

    pub fn profiles_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.profiles_dir)
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        if self.log_file.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.data_dir).join(&self.log_file))
        }
    }
}

/// Per-connection I/O limits.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConnectionConfig {
    /// Upper bound on the bytes taken from a socket in one readiness turn.
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,
    /// Longest command line accepted; a client exceeding it is disconnected.
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: default_read_buffer_size(),
            max_line_length: default_max_line_length(),
        }
    }
}

/// Audio streaming settings.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StreamConfig {
    /// How many frames one connection may write before the loop moves on.
    #[serde(default = "default_frames_per_turn")]
    pub frames_per_turn: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            frames_per_turn: default_frames_per_turn(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    6600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_data_dir() -> String {
    "repository".to_string()
}
fn default_songs_dir() -> String {
    "songRepository".to_string()
}
fn default_accounts_file() -> String {
    "accounts.json".to_string()
}
fn default_songs_file() -> String {
    "songs.json".to_string()
}
fn default_profiles_dir() -> String {
    "profiles".to_string()
}
fn default_log_file() -> String {
    "logs.txt".to_string()
}
fn default_read_buffer_size() -> usize {
    8192
}
fn default_max_line_length() -> usize {
    64 * 1024
}
fn default_frames_per_turn() -> usize {
    256
}

/// Represents the final, validated server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub stream: StreamConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            storage: StorageConfig::default(),
            connection: ConnectionConfig::default(),
            stream: StreamConfig::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file and validates it.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        Self::from_toml(&contents).with_context(|| format!("Invalid configuration in '{path}'"))
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration to ensure logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(anyhow!("host cannot be empty"));
        }
        if self.connection.read_buffer_size == 0 {
            return Err(anyhow!("connection.read_buffer_size cannot be 0"));
        }
        if self.connection.max_line_length == 0 {
            return Err(anyhow!("connection.max_line_length cannot be 0"));
        }
        if self.stream.frames_per_turn == 0 {
            return Err(anyhow!("stream.frames_per_turn cannot be 0"));
        }
        if self.storage.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir cannot be empty"));
        }
        Ok(())
    }
}
