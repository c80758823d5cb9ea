// src/core/protocol/line_codec.rs

//! Implements the newline-delimited text framing used by the command protocol,
//! as a `tokio_util::codec` `Decoder`/`Encoder` pair.

use crate::core::TunecastError;
use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

/// The terminator written after every response line.
pub const LINE_TERMINATOR: &[u8] = b"\n";

/// Decodes complete lines out of an accumulating read buffer and encodes
/// response text with the protocol's line terminator.
///
/// A line is everything up to `\n`; a preceding `\r` is dropped as part of the
/// terminator. Bytes without a terminator stay in the buffer until more arrive.
#[derive(Debug)]
pub struct LineCodec {
    max_length: usize,
    /// Where the next newline scan starts, so a long partial line is not
    /// rescanned on every read.
    next_index: usize,
}

impl LineCodec {
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            next_index: 0,
        }
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = TunecastError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let scan_from = self.next_index.min(src.len());
        match src[scan_from..].iter().position(|b| *b == b'\n') {
            Some(offset) => {
                let newline = scan_from + offset;
                self.next_index = 0;
                let raw = src.split_to(newline + 1);
                let mut line = &raw[..newline];
                if let Some(stripped) = line.strip_suffix(b"\r") {
                    line = stripped;
                }
                if line.len() > self.max_length {
                    return Err(TunecastError::LineTooLong(self.max_length));
                }
                Ok(Some(String::from_utf8_lossy(line).into_owned()))
            }
            None if src.len() > self.max_length => Err(TunecastError::LineTooLong(self.max_length)),
            None => {
                self.next_index = src.len();
                Ok(None)
            }
        }
    }
}

impl Encoder<&str> for LineCodec {
    type Error = TunecastError;

    fn encode(&mut self, item: &str, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len() + LINE_TERMINATOR.len());
        dst.extend_from_slice(item.as_bytes());
        dst.extend_from_slice(LINE_TERMINATOR);
        Ok(())
    }
}
