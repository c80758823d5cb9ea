// src/connection/playback.rs

//! An in-flight audio stream for one session.

use crate::core::TunecastError;
use crate::core::audio::AudioStream;
use crate::core::storage::SongKey;
use std::fmt;

/// Streams one song frame by frame.
///
/// At most one frame is buffered. `pending` is the unwritten tail of the frame
/// last loaded; a new frame is only loaded once it is fully written, so the
/// client always sees whole frames back to back.
pub struct Playback {
    song: SongKey,
    stream: Box<dyn AudioStream>,
    frame: Vec<u8>,
    written: usize,
    frames_loaded: u64,
    frame_length: u64,
    cancelled: bool,
}

impl Playback {
    pub fn new(song: SongKey, stream: Box<dyn AudioStream>) -> Self {
        let format = stream.format();
        let frame = Vec::with_capacity(format.frame_size);
        let frame_length = format.frame_length;
        Self {
            song,
            stream,
            frame,
            written: 0,
            frames_loaded: 0,
            frame_length,
            cancelled: false,
        }
    }

    pub fn song(&self) -> &SongKey {
        &self.song
    }

    /// The descriptor line announced before the first frame.
    pub fn descriptor(&self) -> String {
        self.stream.format().descriptor()
    }

    /// Flags the stream to end before its next frame. Checked by the pump.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn has_pending(&self) -> bool {
        self.written < self.frame.len()
    }

    /// The bytes of the current frame not yet written to the client.
    pub fn pending(&self) -> &[u8] {
        &self.frame[self.written..]
    }

    /// Records that `n` more bytes of the current frame were written.
    pub fn advance(&mut self, n: usize) {
        self.written = (self.written + n).min(self.frame.len());
    }

    pub fn frames_loaded(&self) -> u64 {
        self.frames_loaded
    }

    /// Loads the next frame into the buffer. Returns `false` once the stream
    /// reached its announced length or the source ran dry.
    pub fn load_next_frame(&mut self) -> Result<bool, TunecastError> {
        if self.frames_loaded >= self.frame_length {
            return Ok(false);
        }
        if !self.stream.read_frame(&mut self.frame)? {
            self.frame.clear();
            self.written = 0;
            return Ok(false);
        }
        self.written = 0;
        self.frames_loaded += 1;
        Ok(true)
    }
}

impl fmt::Debug for Playback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Playback")
            .field("song", &self.song)
            .field("frames_loaded", &self.frames_loaded)
            .field("frame_length", &self.frame_length)
            .field("pending", &(self.frame.len() - self.written))
            .field("cancelled", &self.cancelled)
            .finish()
    }
}
