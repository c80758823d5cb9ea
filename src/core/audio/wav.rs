// src/core/audio/wav.rs

//! Streams the raw PCM frames of a WAV file.
//!
//! `symphonia` parses the container and hands back packets of undecoded
//! bytes from the data chunk; they are re-cut into frame-sized pieces here.
//! File reads are synchronous and happen on the event loop thread, one packet
//! at a time.

use super::{AudioFormat, AudioStream};
use crate::core::TunecastError;
use bytes::BytesMut;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use symphonia::core::codecs::{
    CODEC_TYPE_PCM_F32BE, CODEC_TYPE_PCM_F64BE, CODEC_TYPE_PCM_S16BE, CODEC_TYPE_PCM_S24BE,
    CODEC_TYPE_PCM_S32BE, CODEC_TYPE_PCM_U16BE, CODEC_TYPE_PCM_U24BE, CODEC_TYPE_PCM_U32BE,
    CodecType,
};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

const BIG_ENDIAN_CODECS: [CodecType; 8] = [
    CODEC_TYPE_PCM_S16BE,
    CODEC_TYPE_PCM_S24BE,
    CODEC_TYPE_PCM_S32BE,
    CODEC_TYPE_PCM_U16BE,
    CODEC_TYPE_PCM_U24BE,
    CODEC_TYPE_PCM_U32BE,
    CODEC_TYPE_PCM_F32BE,
    CODEC_TYPE_PCM_F64BE,
];

pub struct WavStream {
    reader: Box<dyn FormatReader>,
    track_id: u32,
    format: AudioFormat,
    pending: BytesMut,
}

impl WavStream {
    /// Opens and probes a WAV file, reading its header but no audio data.
    pub fn open(path: &Path) -> Result<Self, TunecastError> {
        let file = File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());
        let mut hint = Hint::new();
        hint.with_extension("wav");

        let probed = symphonia::default::get_probe().format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )?;
        let reader = probed.format;

        let track = reader.default_track().ok_or_else(|| {
            TunecastError::Audio(format!("no audio track in {}", path.display()))
        })?;
        let params = &track.codec_params;
        let missing =
            |what: &str| TunecastError::Audio(format!("{} has no {what}", path.display()));

        let sample_rate = params.sample_rate.ok_or_else(|| missing("sample rate"))?;
        let bits_per_sample = params
            .bits_per_sample
            .ok_or_else(|| missing("sample size"))?;
        let channels = params
            .channels
            .ok_or_else(|| missing("channel layout"))?
            .count() as u32;
        let frame_length = params.n_frames.ok_or_else(|| missing("frame count"))?;

        let format = AudioFormat {
            sample_rate: sample_rate as f32,
            bits_per_sample,
            channels,
            frame_size: (channels * bits_per_sample.div_ceil(8)) as usize,
            frame_rate: sample_rate as f32,
            big_endian: BIG_ENDIAN_CODECS.contains(&params.codec),
            frame_length,
        };
        let track_id = track.id;

        Ok(Self {
            reader,
            track_id,
            format,
            pending: BytesMut::new(),
        })
    }
}

impl AudioStream for WavStream {
    fn format(&self) -> &AudioFormat {
        &self.format
    }

    fn read_frame(&mut self, frame: &mut Vec<u8>) -> Result<bool, TunecastError> {
        let size = self.format.frame_size;
        while self.pending.len() < size {
            match self.reader.next_packet() {
                Ok(packet) => {
                    if packet.track_id() == self.track_id {
                        self.pending.extend_from_slice(packet.buf());
                    }
                }
                Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => {
                    return Ok(false);
                }
                Err(e) => return Err(e.into()),
            }
        }
        frame.clear();
        frame.extend_from_slice(&self.pending.split_to(size));
        Ok(true)
    }
}
