// src/core/protocol/mod.rs

pub mod line_codec;
pub mod tokenizer;
pub use line_codec::{LINE_TERMINATOR, LineCodec};
pub use tokenizer::tokenize;

/// The line that closes every audio stream, whether it ran to the end or not.
pub const STOP_MARKER: &str = "Stop song";
