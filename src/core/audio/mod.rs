// src/core/audio/mod.rs

//! Audio sources that can be streamed frame by frame to a client.
//!
//! The server never decodes audio: a frame is the raw PCM bytes for one
//! sample across all channels, exactly as stored in the source.

mod clip;
mod wav;

pub use clip::PcmClip;
pub use wav::WavStream;

use crate::core::TunecastError;
use std::fmt;

/// The format of an audio stream, as announced to the client before the first
/// frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFormat {
    pub sample_rate: f32,
    pub bits_per_sample: u32,
    pub channels: u32,
    /// Bytes per frame (all channels of one sample).
    pub frame_size: usize,
    pub frame_rate: f32,
    pub big_endian: bool,
    /// Total number of frames in the stream.
    pub frame_length: u64,
}

impl AudioFormat {
    /// Renders the descriptor line that precedes the frames of a `play`
    /// response:
    /// `format,<sampleRate>,<bits>,<channels>,<frameSize>,<frameRate>,<bigEndian>,<frameLength>`.
    pub fn descriptor(&self) -> String {
        format!(
            "format,{:?},{},{},{},{:?},{},{}",
            self.sample_rate,
            self.bits_per_sample,
            self.channels,
            self.frame_size,
            self.frame_rate,
            self.big_endian,
            self.frame_length
        )
    }
}

/// A source of fixed-size audio frames.
pub trait AudioStream: Send {
    fn format(&self) -> &AudioFormat;

    /// Replaces the contents of `frame` with the next frame. Returns `false`
    /// once the source has no complete frame left.
    fn read_frame(&mut self, frame: &mut Vec<u8>) -> Result<bool, TunecastError>;
}

/// Hands out a fresh stream for every playback.
pub trait AudioSource: fmt::Debug + Send + Sync {
    fn open(&self) -> Result<Box<dyn AudioStream>, TunecastError>;
}
