//! Line-based codec for tokio.
//!
//! Reads and writes newline-terminated lines. Decoded lines are stripped of
//! their `\r\n` / `\n` terminator; encoded lines have `\r\n` appended.
//!
//! Lines are limited to [`crate::MAX_LINE_LEN`] bytes by default. Malformed
//! frames - over-long lines and lines that are not valid UTF-8 - are
//! dropped inside the codec (logged, never fatal), matching the protocol's
//! treat-noise-as-noise stance; only genuine I/O failures surface as errors
//! and end the stream.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

use crate::error::{ProtocolError, Result};

/// Newline-delimited codec with a length cap.
pub struct LineCodec {
    /// Index of next byte to check for a newline.
    next_index: usize,
    /// Maximum line length in bytes, terminator included.
    max_len: usize,
    /// When set, bytes are being thrown away until the next newline because
    /// the current line already exceeded `max_len`.
    discarding: bool,
}

impl LineCodec {
    /// Create a codec with the default length limit.
    pub fn new() -> Self {
        Self {
            next_index: 0,
            max_len: crate::MAX_LINE_LEN,
            discarding: false,
        }
    }

    /// Create a codec with a custom maximum line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            max_len,
            ..Self::new()
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        loop {
            let newline = src[self.next_index..].iter().position(|b| *b == b'\n');

            if self.discarding {
                match newline {
                    Some(offset) => {
                        // End of the over-long line: drop it and resume.
                        let dropped = src.split_to(self.next_index + offset + 1);
                        self.next_index = 0;
                        self.discarding = false;
                        debug!(bytes = dropped.len(), "dropped over-long line");
                        continue;
                    }
                    None => {
                        // Still inside the over-long line.
                        src.clear();
                        self.next_index = 0;
                        return Ok(None);
                    }
                }
            }

            match newline {
                Some(offset) => {
                    let line = src.split_to(self.next_index + offset + 1);
                    self.next_index = 0;

                    if line.len() > self.max_len {
                        debug!(
                            bytes = line.len(),
                            limit = self.max_len,
                            "dropped over-long line"
                        );
                        continue;
                    }

                    match String::from_utf8(line.to_vec()) {
                        Ok(text) => {
                            return Ok(Some(text.trim_end_matches(&['\r', '\n'][..]).to_string()));
                        }
                        Err(e) => {
                            debug!(
                                byte_pos = e.utf8_error().valid_up_to(),
                                "dropped non-UTF-8 line"
                            );
                            continue;
                        }
                    }
                }
                None => {
                    if src.len() > self.max_len {
                        // Partial line already over the limit: switch to
                        // discard mode so the buffer cannot grow unbounded.
                        self.discarding = true;
                        continue;
                    }
                    // No complete line yet; remember where we stopped.
                    self.next_index = src.len();
                    return Ok(None);
                }
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None => {
                // An unterminated trailing fragment is malformed; drop it so
                // the end of stream reads as a clean disconnect.
                if !src.is_empty() {
                    debug!(bytes = src.len(), "dropped unterminated trailing bytes");
                    src.clear();
                    self.next_index = 0;
                }
                Ok(None)
            }
        }
    }
}

impl<T: AsRef<str>> Encoder<T> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: T, dst: &mut BytesMut) -> Result<()> {
        dst.extend_from_slice(line.as_ref().as_bytes());
        dst.extend_from_slice(b"\r\n");
        Ok(())
    }
}
