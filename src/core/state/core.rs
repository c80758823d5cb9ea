// src/core/state/core.rs

//! Defines the central `ServerState` struct, holding all server-wide state.

use super::client::{ClientInfo, ConnectionId};
use super::sessions::SessionRegistry;
use super::stats::StatsState;
use crate::config::Config;
use crate::core::persistence::Repository;
use crate::core::storage::{AccountStore, ProfileStore, SongCatalog, SongKey};
use std::collections::HashMap;
use tracing::{error, info, warn};

/// The central struct holding all server-wide state.
///
/// It is owned by the connection loop and lent out, one command at a time, to
/// the router. Nothing in here is shared across threads, so it needs no locks.
#[derive(Debug)]
pub struct ServerState {
    pub config: Config,
    /// Registered accounts, keyed by email.
    pub accounts: AccountStore,
    /// Playlists of every known user.
    pub profiles: ProfileStore,
    /// Playable songs and their live listener counts.
    pub catalog: SongCatalog,
    /// Where mutations are written back to.
    pub repository: Repository,
    /// Which user is logged in on which connection.
    pub sessions: SessionRegistry,
    /// Metadata of every open connection.
    pub clients: HashMap<ConnectionId, ClientInfo>,
    pub stats: StatsState,
}

impl ServerState {
    /// Builds the server state, loading accounts, songs and profiles from the
    /// configured data directory. Unreadable data is logged and skipped.
    pub fn initialize(config: Config) -> Self {
        let repository = Repository::new(&config.storage);

        let accounts = AccountStore::new(repository.load_accounts());
        let catalog = SongCatalog::new(repository.load_songs());
        let profiles = ProfileStore::new(repository.load_profiles(accounts.emails()));
        info!(
            "Loaded {} accounts, {} profiles and {} songs from '{}'.",
            accounts.len(),
            profiles.len(),
            catalog.len(),
            config.storage.data_dir
        );

        Self {
            config,
            accounts,
            profiles,
            catalog,
            repository,
            sessions: SessionRegistry::new(),
            clients: HashMap::new(),
            stats: StatsState::new(),
        }
    }

    /// Writes the user's profile back to disk. Failures are logged; the
    /// in-memory profile stays authoritative.
    pub fn persist_profile(&self, username: &str) {
        let Some(profile) = self.profiles.get(username) else {
            warn!("No profile loaded for {}; nothing to save.", username);
            return;
        };
        if let Err(e) = self.repository.save_profile(profile) {
            error!("Failed to save the profile of {}: {}", username, e);
        }
    }

    /// Takes back a listener counted when a stream started.
    pub fn release_listen(&mut self, song: &SongKey) {
        if self.catalog.stop(song).is_err() {
            warn!("Song '{}' vanished from the catalog while streaming.", song);
        }
    }
}
