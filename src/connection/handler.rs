// src/connection/handler.rs

//! Defines the `ConnectionHandler`, which serves one client inside the shared
//! event loop.
//!
//! The handler owns no task of its own. Every readiness turn the loop calls
//! [`ConnectionHandler::turn`], which flushes queued output, performs one
//! bounded read, executes every complete command line, and then advances the
//! audio stream, if any. No socket operation in a turn blocks, so a peer that
//! stops reading only stalls its own connection.

use super::session::SessionState;
use crate::config::Config;
use crate::core::handler::command_router::{RouteResponse, Router};
use crate::core::protocol::{LineCodec, STOP_MARKER};
use crate::core::state::{ConnectionId, ServerState};
use crate::core::{Command, TunecastError};
use bytes::{Buf, BytesMut};
use std::io::{self, ErrorKind};
use std::net::SocketAddr;
use tokio::io::{Interest, Ready};
use tokio::net::TcpStream;
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, error, info, warn};

/// Whether a connection survives its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Open,
    Closed,
}

/// What one non-blocking read produced.
enum ReadOutcome {
    Data,
    Idle,
    Eof,
}

/// Manages the full lifecycle of a client connection.
pub struct ConnectionHandler {
    id: ConnectionId,
    addr: SocketAddr,
    stream: TcpStream,
    codec: LineCodec,
    /// Received bytes not yet split into lines.
    read_buf: BytesMut,
    /// Target of the bounded read; its length caps one read.
    scratch: Vec<u8>,
    /// Output not yet taken by the socket: replies, frame tails and markers.
    write_buf: BytesMut,
    /// Set by `disconnect`; the connection closes once `write_buf` drains.
    closing: bool,
    frames_per_turn: usize,
    session: SessionState,
}

impl ConnectionHandler {
    pub fn new(stream: TcpStream, addr: SocketAddr, id: ConnectionId, config: &Config) -> Self {
        Self {
            id,
            addr,
            stream,
            codec: LineCodec::new(config.connection.max_line_length),
            read_buf: BytesMut::with_capacity(config.connection.read_buffer_size),
            scratch: vec![0; config.connection.read_buffer_size],
            write_buf: BytesMut::new(),
            closing: false,
            frames_per_turn: config.stream.frames_per_turn,
            session: SessionState::new(),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// While output is queued only writability matters; reading resumes once
    /// the queue drains. A stream in flight also waits for writability.
    pub fn interest(&self) -> Interest {
        if !self.write_buf.is_empty() {
            Interest::WRITABLE
        } else if self.session.is_streaming() {
            Interest::READABLE | Interest::WRITABLE
        } else {
            Interest::READABLE
        }
    }

    /// Resolves once the socket is ready for this connection's interest. The
    /// future borrows only the socket.
    pub fn ready(&self) -> impl Future<Output = io::Result<Ready>> + '_ {
        let interest = self.interest();
        let stream = &self.stream;
        async move { stream.ready(interest).await }
    }

    /// Runs one readiness turn for this connection. Nothing in a turn waits on
    /// the socket: output the peer cannot take yet stays queued for a later turn.
    pub fn turn(&mut self, state: &mut ServerState) -> Liveness {
        let drained = match self.flush() {
            Ok(drained) => drained,
            Err(e) => {
                log_io_error(self.id, self.addr, &e);
                return Liveness::Closed;
            }
        };
        if self.closing {
            return self.linger();
        }

        if drained {
            match self.read_once() {
                Ok(ReadOutcome::Eof) => {
                    debug!("Connection {} ({}) closed by peer.", self.id, self.addr);
                    return Liveness::Closed;
                }
                Ok(ReadOutcome::Data | ReadOutcome::Idle) => {}
                Err(e) => {
                    log_io_error(self.id, self.addr, &e);
                    return Liveness::Closed;
                }
            }
        }

        match self.process_buffered(state) {
            Ok(()) => {}
            Err(TunecastError::LineTooLong(max)) => {
                warn!(
                    "Connection {} ({}) sent a line longer than {} bytes; closing.",
                    self.id, self.addr, max
                );
                return Liveness::Closed;
            }
            Err(e) => {
                warn!("Connection {} ({}) failed: {}", self.id, self.addr, e);
                return Liveness::Closed;
            }
        }
        if self.closing {
            return self.linger();
        }

        if let Err(e) = self.pump_playback(state) {
            warn!("Connection {} ({}) failed while streaming: {}", self.id, self.addr, e);
            return Liveness::Closed;
        }
        Liveness::Open
    }

    /// Releases everything the connection holds in the shared state. A stream
    /// still running counts as stopped.
    pub fn teardown(&mut self, state: &mut ServerState) {
        if let Some(playback) = self.session.playback.take()
            && !playback.is_cancelled()
        {
            state.release_listen(playback.song());
            debug!("Connection {} dropped its stream of {}.", self.id, playback.song());
        }
        if let Some(user) = self.session.user.take()
            && state.sessions.release(&user, self.id)
        {
            info!("User {} logged out (connection {} closed).", user, self.id);
        }
        if let Some(client) = state.clients.remove(&self.id) {
            debug!(
                "Connection {} was open for {:.1?}, idle for {:.1?}.",
                self.id,
                client.created.elapsed(),
                client.last_command_time.elapsed()
            );
        }
    }

    /// A closing connection stays registered until its last reply is out.
    fn linger(&self) -> Liveness {
        if self.write_buf.is_empty() {
            Liveness::Closed
        } else {
            Liveness::Open
        }
    }

    /// Performs exactly one non-blocking read of at most `read_buffer_size` bytes.
    fn read_once(&mut self) -> io::Result<ReadOutcome> {
        match self.stream.try_read(&mut self.scratch) {
            Ok(0) => Ok(ReadOutcome::Eof),
            Ok(n) => {
                self.read_buf.extend_from_slice(&self.scratch[..n]);
                Ok(ReadOutcome::Data)
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(ReadOutcome::Idle),
            Err(e) => Err(e),
        }
    }

    /// Writes queued output until the socket would block. Returns `true` once
    /// nothing is left queued.
    fn flush(&mut self) -> io::Result<bool> {
        while !self.write_buf.is_empty() {
            match self.stream.try_write(&self.write_buf) {
                Ok(0) => return Err(ErrorKind::WriteZero.into()),
                Ok(n) => self.write_buf.advance(n),
                Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(false),
                Err(e) => return Err(e),
            }
        }
        Ok(true)
    }

    /// Executes complete lines in order. Decoding pauses while a reply is
    /// still queued, so replies go out in command order and a peer that does
    /// not read cannot pile up work.
    fn process_buffered(&mut self, state: &mut ServerState) -> Result<(), TunecastError> {
        while !self.closing && self.write_buf.is_empty() {
            let Some(line) = self.codec.decode(&mut self.read_buf)? else {
                break;
            };
            self.process_line(&line, state)?;
        }
        Ok(())
    }

    /// Parses a line, routes it as a command, and queues the response.
    fn process_line(&mut self, line: &str, state: &mut ServerState) -> Result<(), TunecastError> {
        state.stats.increment_total_commands();
        if let Some(info) = state.clients.get_mut(&self.id) {
            info.touch();
        }

        let command = Command::from_line(line);
        debug!("Connection {}: received command '{}'", self.id, command.name());

        let routed = Router::new(state, self.id, self.addr, &mut self.session).route(command);
        match routed {
            Ok(RouteResponse::Single(text)) => self.send_text(&text, state),
            Ok(RouteResponse::StartStream { header }) => {
                debug!("Connection {}: streaming with header {}", self.id, header);
                self.send_text(&header, state)
            }
            Ok(RouteResponse::Close(text)) => {
                self.closing = true;
                self.send_text(&text, state)
            }
            Err(e) => self.send_error_to_client(e, state),
        }
    }

    /// Sends an error reply. Runtime failures are logged and the client only
    /// gets the generic apology.
    fn send_error_to_client(
        &mut self,
        e: TunecastError,
        state: &mut ServerState,
    ) -> Result<(), TunecastError> {
        if e.is_runtime() {
            error!("Connection {} ({}): {}", self.id, self.addr, e);
        } else {
            debug!("Connection {}: sending error response: {}", self.id, e);
        }
        self.send_text(&e.client_message(), state)
    }

    /// Queues one response line and writes as much as the socket takes. Any
    /// half-written frame is queued ahead of it and a cancelled stream is
    /// closed with its marker, so text never splits a frame and a stop reply
    /// always follows the marker.
    fn send_text(&mut self, text: &str, state: &mut ServerState) -> Result<(), TunecastError> {
        self.settle_playback(state)?;
        self.codec.encode(text, &mut self.write_buf)?;
        self.flush()?;
        Ok(())
    }

    fn settle_playback(&mut self, state: &mut ServerState) -> Result<(), TunecastError> {
        let Some(playback) = self.session.playback.as_mut() else {
            return Ok(());
        };
        if playback.has_pending() {
            let n = playback.pending().len();
            self.write_buf.extend_from_slice(playback.pending());
            playback.advance(n);
            state.stats.add_audio_bytes(n);
        }
        if playback.is_cancelled() {
            self.finish_playback()?;
        }
        Ok(())
    }

    /// Drops the stream and queues the end-of-stream marker. The listen
    /// counter is left to the caller.
    fn finish_playback(&mut self) -> Result<(), TunecastError> {
        if let Some(playback) = self.session.playback.take() {
            info!(
                "Connection {} finished streaming {} after {} frames.",
                self.id,
                playback.song(),
                playback.frames_loaded()
            );
        }
        self.codec.encode(STOP_MARKER, &mut self.write_buf)
    }

    /// Writes frames until the socket would block, the per-turn budget is
    /// spent, or the stream ends. Frames wait while text is queued.
    fn pump_playback(&mut self, state: &mut ServerState) -> Result<(), TunecastError> {
        let mut sent = 0;
        while sent < self.frames_per_turn && self.write_buf.is_empty() {
            let Some(playback) = self.session.playback.as_mut() else {
                return Ok(());
            };
            if playback.is_cancelled() {
                self.settle_playback(state)?;
                self.flush()?;
                return Ok(());
            }

            if playback.has_pending() {
                match self.stream.try_write(playback.pending()) {
                    Ok(n) => {
                        playback.advance(n);
                        state.stats.add_audio_bytes(n);
                        if !playback.has_pending() {
                            sent += 1;
                        }
                        continue;
                    }
                    Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(()),
                    Err(e) => return Err(e.into()),
                }
            }

            match playback.load_next_frame() {
                Ok(true) => {}
                // Ran to the end: the listener stays counted.
                Ok(false) => {
                    self.finish_playback()?;
                    self.flush()?;
                    return Ok(());
                }
                Err(e) => {
                    error!(
                        "Connection {}: reading {} failed: {}",
                        self.id,
                        playback.song(),
                        e
                    );
                    let song = playback.song().clone();
                    state.release_listen(&song);
                    self.finish_playback()?;
                    self.flush()?;
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}

/// Logs a socket error, keeping ordinary disconnects at debug level.
fn log_io_error(id: ConnectionId, addr: SocketAddr, e: &io::Error) {
    if is_normal_disconnect(e) {
        debug!("Connection {} ({}) closed by peer: {}", id, addr, e);
    } else {
        warn!("Connection error for {} ({}): {}", id, addr, e);
    }
}

fn is_normal_disconnect(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        ErrorKind::ConnectionReset
            | ErrorKind::BrokenPipe
            | ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionAborted
    )
}
