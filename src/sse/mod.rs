//! Start-stream (Server-Sent Events) decoding.
//!
//! The start endpoint streams one event per line, each line carrying a
//! fixed-width `data:` prefix followed by a JSON frame.
//!
//! # Module structure
//! - `events` - Frame types (EventFrame, FrameError)
//! - `utf8` - Chunk-safe UTF-8 decoding
//! - `decoder` - Line framing (FrameDecoder, parse_frame_line)

mod decoder;
mod events;
mod utf8;

pub use decoder::{parse_frame_line, DecodedFrames, FrameDecoder, PREFIX_LEN};
pub use events::{EventFrame, FrameError};
pub use utf8::Utf8ChunkDecoder;
