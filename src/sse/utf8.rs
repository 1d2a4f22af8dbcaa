//! Streaming UTF-8 decoding for chunked response bodies.

/// Decodes byte chunks into text without splitting code points.
///
/// A multi-byte sequence cut by a chunk boundary is carried over and
/// completed by the next chunk. Bytes that can never form valid UTF-8 are
/// replaced with U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    carry: Vec<u8>,
}

impl Utf8ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of `chunk` (plus any carried bytes) as possible.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.carry.extend_from_slice(chunk);

        let mut text = String::with_capacity(self.carry.len());
        let mut consumed = 0;

        loop {
            match std::str::from_utf8(&self.carry[consumed..]) {
                Ok(valid) => {
                    text.push_str(valid);
                    consumed = self.carry.len();
                    break;
                }
                Err(e) => {
                    let valid_up_to = e.valid_up_to();
                    text.push_str(&String::from_utf8_lossy(
                        &self.carry[consumed..consumed + valid_up_to],
                    ));
                    consumed += valid_up_to;

                    match e.error_len() {
                        Some(len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            consumed += len;
                        }
                        // Truncated sequence at the end: wait for more bytes
                        None => break,
                    }
                }
            }
        }

        self.carry.drain(..consumed);
        text
    }

    /// Number of bytes held back waiting for the rest of a code point.
    pub fn pending_len(&self) -> usize {
        self.carry.len()
    }

    /// Drop any incomplete trailing sequence, returning how many bytes were lost.
    pub fn finish(&mut self) -> usize {
        let dropped = self.carry.len();
        self.carry.clear();
        dropped
    }
}
