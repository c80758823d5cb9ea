// tests/integration/session_flow_test.rs

//! Login, registration and connection lifecycle over TCP.

use super::test_helpers::{TestServer, clip_song};

#[tokio::test]
async fn test_register_login_and_build_a_playlist() {
    let server = TestServer::start(vec![clip_song("Hello", "World", 10)]).await;
    let mut client = server.connect().await;

    client.login("ana@music.com", "pw").await;
    assert_eq!(
        client.command("create-playlist rock").await,
        "A playlist with a name rock created successfully!"
    );
    assert_eq!(client.command("show-playlist rock").await, "There are no songs.");
    assert_eq!(
        client.command("add-song-to rock Hello World").await,
        "You have successfully added new song in playlist rock!"
    );
    assert_eq!(client.command("show-playlist rock").await, "Hello - World");

    server.stop().await;
}

#[tokio::test]
async fn test_argument_count_is_checked_before_login() {
    let server = TestServer::start(vec![]).await;
    let mut client = server.connect().await;

    assert_eq!(
        client.command("top").await,
        "Invalid count of arguments: \"top\" expects 1 arguments. Example: \"top <number>\""
    );
    assert_eq!(
        client.command("search").await,
        "Invalid count of arguments: search expects more than zero arguments. Example: \"search <words>\""
    );
    assert_eq!(
        client.command("top 1").await,
        "You must be logged in to execute this command!"
    );
    assert_eq!(client.command("dance now").await, "Unknown command");

    server.stop().await;
}

#[tokio::test]
async fn test_user_can_be_logged_in_only_once() {
    let server = TestServer::start(vec![]).await;
    let mut first = server.connect().await;
    let mut second = server.connect().await;

    first.login("bo@music.com", "pw").await;
    assert_eq!(
        first.command("login bo@music.com pw").await,
        "You are logged in. You cannot do it again."
    );
    assert_eq!(
        second.command("login bo@music.com pw").await,
        "You are logged in. You cannot do it again."
    );
    assert_eq!(
        first.command("register new@music.com pw").await,
        "You are logged in. You cannot register."
    );

    assert_eq!(
        first.command("disconnect").await,
        "You have successfully disconnected!"
    );
    assert!(first.is_closed().await);

    assert_eq!(
        second.command("login bo@music.com pw").await,
        "You have successfully logged in"
    );

    server.stop().await;
}

#[tokio::test]
async fn test_dropped_connection_releases_the_login() {
    let server = TestServer::start(vec![]).await;
    let mut first = server.connect().await;
    first.login("cy@music.com", "pw").await;
    drop(first);

    let mut second = server.connect().await;
    let mut reply = second.command("login cy@music.com pw").await;
    // The close may be noticed a turn after the new connection's command.
    for _ in 0..50 {
        if reply == "You have successfully logged in" {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        reply = second.command("login cy@music.com pw").await;
    }
    assert_eq!(reply, "You have successfully logged in");

    let (state, _dir) = server.stop().await;
    assert!(state.sessions.is_empty());
}

#[tokio::test]
async fn test_login_failures() {
    let server = TestServer::start(vec![]).await;
    let mut client = server.connect().await;

    assert_eq!(
        client.command("login nobody@music.com pw").await,
        "Such an account does not exist. You can register."
    );
    assert_eq!(
        client.command("register not-an-email pw").await,
        "Wrong email format!"
    );
    assert_eq!(
        client.command("register di@music.com right").await,
        "You have successfully registered!"
    );
    assert_eq!(
        client.command("register di@music.com again").await,
        "A user with such an email already exists."
    );
    assert_eq!(
        client.command("login di@music.com wrong").await,
        "Wrong password. Please, try again"
    );
    assert_eq!(
        client.command("login di@music.com right").await,
        "You have successfully logged in"
    );

    server.stop().await;
}

#[tokio::test]
async fn test_disconnect_works_without_login() {
    let server = TestServer::start(vec![]).await;
    let mut client = server.connect().await;

    assert_eq!(
        client.command("disconnect").await,
        "You have successfully disconnected!"
    );
    assert!(client.is_closed().await);

    let (state, _dir) = server.stop().await;
    assert!(state.clients.is_empty());
}

#[tokio::test]
async fn test_commands_split_across_writes_and_pipelined() {
    let server = TestServer::start(vec![]).await;
    let mut client = server.connect().await;

    // One line delivered in two pieces, then two lines in one write.
    client.send_raw(b"regis").await;
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    client.send_raw(b"ter ed@music.com pw\r\nlogin ed@music.com pw\n").await;

    assert_eq!(client.read_line().await, "You have successfully registered!");
    assert_eq!(client.read_line().await, "You have successfully logged in");

    server.stop().await;
}

#[tokio::test]
async fn test_overlong_line_closes_the_connection() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut config = super::test_helpers::test_config(dir.path());
    config.connection.max_line_length = 32;
    let server = TestServer::start_in(dir, config, vec![]).await;

    let mut client = server.connect().await;
    client.send_raw(&[b'a'; 64]).await;
    assert!(client.is_closed().await);

    let mut other = server.connect().await;
    assert_eq!(other.command("bogus").await, "Unknown command");

    server.stop().await;
}
