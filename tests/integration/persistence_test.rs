// tests/integration/persistence_test.rs

//! Data written by one server run is loaded by the next.

use super::test_helpers::{TestServer, clip_song};
use tunecast::core::state::ServerState;
use tunecast::core::storage::SongKey;

#[tokio::test]
async fn test_accounts_and_playlists_survive_a_restart() {
    let server = TestServer::start(vec![clip_song("Hello", "World", 10)]).await;
    let config = server.config.clone();
    let mut client = server.connect().await;
    client.login("ana@music.com", "pw").await;
    client.command("create-playlist rock").await;
    client.command("add-song-to rock Hello World").await;
    let (_state, dir) = server.stop().await;

    let restored = ServerState::initialize(config.clone());
    assert!(restored.accounts.contains("ana@music.com"));
    assert_eq!(
        restored
            .profiles
            .get("ana@music.com")
            .unwrap()
            .show_playlist("rock")
            .unwrap(),
        "Hello - World"
    );

    let server = TestServer::start_in(dir, config, vec![clip_song("Hello", "World", 10)]).await;
    let mut client = server.connect().await;
    assert_eq!(
        client.command("login ana@music.com pw").await,
        "You have successfully logged in"
    );
    assert_eq!(client.command("show-playlist rock").await, "Hello - World");
    assert_eq!(
        client.command("register ana@music.com other").await,
        "You are logged in. You cannot register."
    );
    server.stop().await;
}

#[tokio::test]
async fn test_malformed_lines_are_skipped() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = super::test_helpers::test_config(dir.path());
    std::fs::create_dir_all(&config.storage.data_dir).unwrap();
    std::fs::write(
        config.storage.songs_path(),
        "{\"name\":\"Good\",\"artist\":\"One\",\"file\":\"good.wav\"}\n\
         not json at all\n\
         \n\
         {\"name\":\"Also\",\"artist\":\"Fine\",\"file\":\"fine.wav\"}\n",
    )
    .unwrap();
    std::fs::write(config.storage.accounts_path(), "{\"broken\": true}\n").unwrap();

    let state = ServerState::initialize(config);
    assert_eq!(state.catalog.len(), 2);
    assert!(state.catalog.exists(&SongKey::new("Good", "One")));
    assert!(state.catalog.exists(&SongKey::new("Also", "Fine")));
    assert!(state.accounts.is_empty());
}

#[test]
fn test_missing_data_directory_starts_empty() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = super::test_helpers::test_config(&dir.path().join("nowhere"));
    let state = ServerState::initialize(config);
    assert!(state.accounts.is_empty());
    assert!(state.catalog.is_empty());
    assert!(state.profiles.is_empty());
}
