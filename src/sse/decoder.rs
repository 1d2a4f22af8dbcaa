//! Line framing for the start stream.
//!
//! The decoder keeps the unterminated tail of the stream between chunks and
//! hands back frames for every complete line. Framing rules per line:
//!
//! 1. Trim surrounding whitespace; blank lines are skipped.
//! 2. Drop the first [`PREFIX_LEN`] characters. The prefix is positional,
//!    its text is never checked.
//! 3. An empty remainder is skipped.
//! 4. The remainder is parsed as an [`EventFrame`]. Failures are logged and
//!    the line is skipped.

use tracing::warn;

use crate::sse::events::{EventFrame, FrameError};
use crate::sse::utf8::Utf8ChunkDecoder;

/// Width of the `data:` prefix stripped from every line.
pub const PREFIX_LEN: usize = 5;

/// Parse one complete line.
///
/// Returns:
/// - `Ok(Some(frame))` - the line carried a frame
/// - `Ok(None)` - the line is blank or has nothing after the prefix
/// - `Err(error)` - the payload is not a valid frame
pub fn parse_frame_line(line: &str) -> Result<Option<EventFrame>, FrameError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let payload = match trimmed.char_indices().nth(PREFIX_LEN) {
        Some((offset, _)) => &trimmed[offset..],
        None => "",
    };
    if payload.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(payload)
        .map(Some)
        .map_err(|e| FrameError::Malformed {
            line: trimmed.to_string(),
            message: e.to_string(),
        })
}

/// Incremental decoder bound to a single stream.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    utf8: Utf8ChunkDecoder,
    /// Text received but not yet terminated by a newline
    pending: String,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a raw body chunk.
    pub fn feed(&mut self, chunk: &[u8]) -> DecodedFrames {
        let text = self.utf8.decode(chunk);
        self.feed_str(&text)
    }

    /// Feed already-decoded text.
    ///
    /// Only the complete lines are taken out of the buffer; the trailing
    /// segment after the last newline stays for the next call.
    pub fn feed_str(&mut self, text: &str) -> DecodedFrames {
        self.pending.push_str(text);

        let Some(last_newline) = self.pending.rfind('\n') else {
            return DecodedFrames::default();
        };

        let tail = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, tail);
        DecodedFrames::new(complete)
    }

    /// Text currently waiting for a newline.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// End of stream.
    ///
    /// The unterminated tail is never parsed here. It is returned (when
    /// non-blank) so the caller can decide whether to flush it.
    pub fn finish(&mut self) -> Option<String> {
        let dropped_bytes = self.utf8.finish();
        if dropped_bytes > 0 {
            warn!(bytes = dropped_bytes, "Dropping truncated UTF-8 sequence at end of stream");
        }

        let tail = std::mem::take(&mut self.pending);
        if tail.trim().is_empty() {
            None
        } else {
            Some(tail)
        }
    }
}

/// Frames from one batch of complete lines, parsed on demand.
///
/// Lines are only parsed as the iterator advances, so a consumer that stops
/// after a terminal frame never touches the rest of the batch.
#[derive(Debug, Default)]
pub struct DecodedFrames {
    lines: String,
    cursor: usize,
}

impl DecodedFrames {
    fn new(lines: String) -> Self {
        Self { lines, cursor: 0 }
    }
}

impl Iterator for DecodedFrames {
    type Item = EventFrame;

    fn next(&mut self) -> Option<EventFrame> {
        while self.cursor < self.lines.len() {
            let rest = &self.lines[self.cursor..];
            let end = rest.find('\n').unwrap_or(rest.len());
            let line = &rest[..end];
            self.cursor += end + 1;

            match parse_frame_line(line) {
                Ok(Some(frame)) => return Some(frame),
                Ok(None) => continue,
                Err(e) => {
                    warn!(error = %e, "Skipping malformed start-stream line");
                    continue;
                }
            }
        }
        None
    }
}
