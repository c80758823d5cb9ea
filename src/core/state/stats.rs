// src/core/state/stats.rs

//! Contains state definitions and logic for server statistics.

/// Server-wide counters, logged at shutdown.
#[derive(Debug, Default)]
pub struct StatsState {
    /// The total number of connections accepted since startup.
    total_connections: u64,
    /// The total number of command lines processed since startup.
    total_commands: u64,
    /// The number of streams started by `play`.
    total_streams: u64,
    /// Bytes of audio written to clients, descriptor and markers excluded.
    audio_bytes_sent: u64,
}

impl StatsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_total_connections(&mut self) {
        self.total_connections += 1;
    }

    pub fn get_total_connections(&self) -> u64 {
        self.total_connections
    }

    pub fn increment_total_commands(&mut self) {
        self.total_commands += 1;
    }

    pub fn get_total_commands(&self) -> u64 {
        self.total_commands
    }

    pub fn increment_total_streams(&mut self) {
        self.total_streams += 1;
    }

    pub fn get_total_streams(&self) -> u64 {
        self.total_streams
    }

    pub fn add_audio_bytes(&mut self, n: usize) {
        self.audio_bytes_sent += n as u64;
    }

    pub fn get_audio_bytes_sent(&self) -> u64 {
        self.audio_bytes_sent
    }
}
