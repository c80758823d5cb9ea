// tests/integration/test_helpers.rs

//! Test helpers and utilities for integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;
use tunecast::config::Config;
use tunecast::connection::SessionState;
use std::sync::Arc;
use tunecast::core::audio::{AudioFormat, AudioSource, AudioStream, PcmClip};
use tunecast::core::handler::command_router::{RouteResponse, Router};
use tunecast::core::state::{ConnectionId, ServerState};
use tunecast::core::storage::{Song, SongSource};
use tunecast::core::{Command, TunecastError};
use tunecast::server::{Server, ShutdownHandle};

const IO_TIMEOUT: Duration = Duration::from_secs(10);

/// Installs a quiet test subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("warn"))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

/// A config whose data lives under `root` and which binds an ephemeral port.
pub fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.port = 0;
    config.storage.data_dir = root.join("repository").to_string_lossy().into_owned();
    config.storage.songs_dir = root.join("songs").to_string_lossy().into_owned();
    config
}

/// An in-memory song of `frames` frames, 16-bit stereo at 44.1 kHz (4-byte frames).
pub fn clip_song(name: &str, artist: &str, frames: usize) -> Song {
    let data: Vec<u8> = (0..frames * 4).map(|i| (i % 251) as u8).collect();
    let clip = PcmClip::new(44100.0, 16, 2, data).expect("valid clip");
    Song::new(name, artist, SongSource::Clip(clip))
}

/// Like `clip_song`, but reading frame number `fail_at` (zero-based) fails.
pub fn failing_song(name: &str, artist: &str, frames: usize, fail_at: u64) -> Song {
    let data: Vec<u8> = (0..frames * 4).map(|i| (i % 251) as u8).collect();
    let clip = PcmClip::new(44100.0, 16, 2, data).expect("valid clip");
    Song::new(
        name,
        artist,
        SongSource::Custom(Arc::new(FailingClip { clip, fail_at })),
    )
}

#[derive(Debug)]
struct FailingClip {
    clip: PcmClip,
    fail_at: u64,
}

impl AudioSource for FailingClip {
    fn open(&self) -> Result<Box<dyn AudioStream>, TunecastError> {
        Ok(Box::new(FailingStream {
            inner: self.clip.rewind(),
            served: 0,
            fail_at: self.fail_at,
        }))
    }
}

struct FailingStream {
    inner: PcmClip,
    served: u64,
    fail_at: u64,
}

impl AudioStream for FailingStream {
    fn format(&self) -> &AudioFormat {
        self.inner.format()
    }

    fn read_frame(&mut self, frame: &mut Vec<u8>) -> Result<bool, TunecastError> {
        if self.served == self.fail_at {
            return Err(TunecastError::Audio("source went away".to_string()));
        }
        self.served += 1;
        self.inner.read_frame(frame)
    }
}

/// The descriptor `play` sends for a `clip_song` of `frames` frames.
pub fn clip_descriptor(frames: usize) -> String {
    format!("format,44100.0,16,2,4,44100.0,false,{frames}")
}

/// Drives the router directly, without sockets. Each connection id gets its
/// own session.
pub struct TestContext {
    pub state: ServerState,
    pub sessions: Vec<SessionState>,
    _dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        init_tracing();
        let dir = TempDir::new().expect("temp dir");
        let state = ServerState::initialize(test_config(dir.path()));
        Self {
            state,
            sessions: Vec::new(),
            _dir: dir,
        }
    }

    pub fn with_songs(songs: impl IntoIterator<Item = Song>) -> Self {
        let mut ctx = Self::new();
        for song in songs {
            ctx.state.catalog.insert(song);
        }
        ctx
    }

    pub fn session(&mut self, conn: usize) -> &mut SessionState {
        while self.sessions.len() <= conn {
            self.sessions.push(SessionState::new());
        }
        &mut self.sessions[conn]
    }

    /// Routes one command line on connection `conn`.
    pub fn exec(&mut self, conn: usize, line: &str) -> Result<RouteResponse, TunecastError> {
        self.session(conn);
        let addr: SocketAddr = "127.0.0.1:4000".parse().expect("addr");
        let session = &mut self.sessions[conn];
        Router::new(&mut self.state, ConnectionId(conn as u64 + 1), addr, session)
            .route(Command::from_line(line))
    }

    /// Routes a line and returns the reply text, successful or not.
    pub fn reply(&mut self, conn: usize, line: &str) -> String {
        match self.exec(conn, line) {
            Ok(RouteResponse::Single(text)) | Ok(RouteResponse::Close(text)) => text,
            Ok(RouteResponse::StartStream { header }) => header,
            Err(e) => e.client_message(),
        }
    }

    /// Registers and logs in `email` on connection `conn`.
    pub fn login(&mut self, conn: usize, email: &str) {
        assert_eq!(
            self.reply(conn, &format!("register {email} secret")),
            "You have successfully registered!"
        );
        assert_eq!(
            self.reply(conn, &format!("login {email} secret")),
            "You have successfully logged in"
        );
    }
}

/// A real server on an ephemeral port, running on a spawned task.
pub struct TestServer {
    pub addr: SocketAddr,
    pub config: Config,
    shutdown: ShutdownHandle,
    task: JoinHandle<ServerState>,
    dir: TempDir,
}

impl TestServer {
    pub async fn start(songs: Vec<Song>) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let config = test_config(dir.path());
        Self::start_in(dir, config, songs).await
    }

    /// Starts a server over an existing directory, e.g. to test a restart.
    pub async fn start_in(dir: TempDir, config: Config, songs: Vec<Song>) -> Self {
        init_tracing();
        let mut server = Server::bind(config.clone()).await.expect("bind");
        for song in songs {
            server.state_mut().catalog.insert(song);
        }
        let addr = server.local_addr().expect("local addr");
        let shutdown = server.shutdown_handle();
        let task = tokio::spawn(server.run());
        Self {
            addr,
            config,
            shutdown,
            task,
            dir,
        }
    }

    pub async fn connect(&self) -> TestClient {
        TestClient::connect(self.addr).await
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Stops the loop and returns its final state along with the data directory.
    pub async fn stop(self) -> (ServerState, TempDir) {
        self.shutdown.stop();
        let state = tokio::time::timeout(IO_TIMEOUT, self.task)
            .await
            .expect("server stopped in time")
            .expect("server task");
        (state, self.dir)
    }
}

pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect");
        let (read, writer) = stream.into_split();
        Self {
            reader: BufReader::new(read),
            writer,
        }
    }

    pub async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\n").as_bytes())
            .await
            .expect("write");
    }

    pub async fn send_raw(&mut self, bytes: &[u8]) {
        self.writer.write_all(bytes).await.expect("write");
    }

    /// Reads one line without its terminator. Panics on EOF.
    pub async fn read_line(&mut self) -> String {
        let mut line = String::new();
        let n = tokio::time::timeout(IO_TIMEOUT, self.reader.read_line(&mut line))
            .await
            .expect("reply in time")
            .expect("read");
        assert!(n > 0, "connection closed while waiting for a line");
        line.trim_end_matches('\n').to_string()
    }

    /// Sends a command and reads a one-line reply.
    pub async fn command(&mut self, line: &str) -> String {
        self.send(line).await;
        self.read_line().await
    }

    /// Sends a command and reads an `n`-line reply.
    pub async fn command_lines(&mut self, line: &str, n: usize) -> Vec<String> {
        self.send(line).await;
        let mut lines = Vec::with_capacity(n);
        for _ in 0..n {
            lines.push(self.read_line().await);
        }
        lines
    }

    pub async fn read_exact(&mut self, n: usize) -> Vec<u8> {
        let mut buf = vec![0; n];
        tokio::time::timeout(IO_TIMEOUT, self.reader.read_exact(&mut buf))
            .await
            .expect("bytes in time")
            .expect("read");
        buf
    }

    /// Reads until the accumulated bytes end with `suffix`.
    pub async fn read_until_suffix(&mut self, suffix: &[u8]) -> Vec<u8> {
        let mut received = Vec::new();
        let mut chunk = [0u8; 4096];
        while !received.ends_with(suffix) {
            let n = tokio::time::timeout(IO_TIMEOUT, self.reader.read(&mut chunk))
                .await
                .expect("bytes in time")
                .expect("read");
            assert!(n > 0, "connection closed before {:?}", String::from_utf8_lossy(suffix));
            received.extend_from_slice(&chunk[..n]);
        }
        received
    }

    /// Reads until `needle` has arrived; bytes after it in the same read are
    /// kept in the result.
    pub async fn read_until_contains(&mut self, needle: &[u8]) -> Vec<u8> {
        let mut received = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = tokio::time::timeout(IO_TIMEOUT, self.reader.read(&mut chunk))
                .await
                .expect("bytes in time")
                .expect("read");
            assert!(n > 0, "connection closed before {:?}", String::from_utf8_lossy(needle));
            let scan_from = received.len().saturating_sub(needle.len());
            received.extend_from_slice(&chunk[..n]);
            if received[scan_from..].windows(needle.len()).any(|w| w == needle) {
                return received;
            }
        }
    }

    /// Repeats `line` until the reply is `expected`, for state another
    /// connection changes asynchronously. Returns the last reply.
    pub async fn command_until(&mut self, line: &str, expected: &str) -> String {
        let mut reply = self.command(line).await;
        for _ in 0..100 {
            if reply == expected {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
            reply = self.command(line).await;
        }
        reply
    }

    /// True once the server has closed the connection.
    pub async fn is_closed(&mut self) -> bool {
        let mut byte = [0u8; 1];
        matches!(
            tokio::time::timeout(IO_TIMEOUT, self.reader.read(&mut byte)).await,
            Ok(Ok(0)) | Ok(Err(_))
        )
    }

    /// Registers and logs in over the wire.
    pub async fn login(&mut self, email: &str, password: &str) {
        assert_eq!(
            self.command(&format!("register {email} {password}")).await,
            "You have successfully registered!"
        );
        assert_eq!(
            self.command(&format!("login {email} {password}")).await,
            "You have successfully logged in"
        );
    }
}

/// Writes a minimal PCM WAV file.
pub fn write_wav(path: &Path, sample_rate: u32, channels: u16, bits: u16, data: &[u8]) {
    let block_align = channels * bits.div_ceil(8);
    let mut wav = Vec::with_capacity(44 + data.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data.len() as u32).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&(data.len() as u32).to_le_bytes());
    wav.extend_from_slice(data);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create dir");
    }
    std::fs::write(path, wav).expect("write wav");
}
