// src/core/audio/clip.rs

use super::{AudioFormat, AudioSource, AudioStream};
use crate::core::TunecastError;
use bytes::Bytes;

/// Little-endian PCM audio held in memory.
///
/// Cloning is cheap and every clone streams from the beginning, so a catalog
/// entry can hand out one clone per playback.
#[derive(Debug, Clone)]
pub struct PcmClip {
    format: AudioFormat,
    data: Bytes,
    position: usize,
}

impl PcmClip {
    /// Builds a clip from interleaved PCM samples. Trailing bytes that do not
    /// fill a whole frame are never streamed.
    pub fn new(
        sample_rate: f32,
        bits_per_sample: u32,
        channels: u32,
        data: impl Into<Bytes>,
    ) -> Result<Self, TunecastError> {
        let frame_size = (channels * bits_per_sample.div_ceil(8)) as usize;
        if frame_size == 0 {
            return Err(TunecastError::Audio(
                "a clip needs at least one channel and one bit per sample".to_string(),
            ));
        }
        let data = data.into();
        let format = AudioFormat {
            sample_rate,
            bits_per_sample,
            channels,
            frame_size,
            frame_rate: sample_rate,
            big_endian: false,
            frame_length: (data.len() / frame_size) as u64,
        };
        Ok(Self {
            format,
            data,
            position: 0,
        })
    }

    /// A fresh stream over the same samples.
    pub fn rewind(&self) -> Self {
        Self {
            format: self.format.clone(),
            data: self.data.clone(),
            position: 0,
        }
    }
}

impl AudioSource for PcmClip {
    fn open(&self) -> Result<Box<dyn AudioStream>, TunecastError> {
        Ok(Box::new(self.rewind()))
    }
}

impl AudioStream for PcmClip {
    fn format(&self) -> &AudioFormat {
        &self.format
    }

    fn read_frame(&mut self, frame: &mut Vec<u8>) -> Result<bool, TunecastError> {
        let end = self.position + self.format.frame_size;
        if end > self.data.len() {
            return Ok(false);
        }
        frame.clear();
        frame.extend_from_slice(&self.data[self.position..end]);
        self.position = end;
        Ok(true)
    }
}
