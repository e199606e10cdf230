//! Streaming UTF-8 decoding.
//!
//! Network reads split multi-byte characters at arbitrary points. The carry
//! keeps the unfinished tail of one chunk and prepends it to the next, so a
//! character is decoded once all of its bytes have arrived.

/// Bytes of an incomplete UTF-8 sequence carried between chunks (at most 3).
#[derive(Debug, Default)]
pub(crate) struct Utf8Carry {
    partial: Vec<u8>,
}

impl Utf8Carry {
    /// Decode `chunk` and append the text to `out`.
    ///
    /// Invalid sequences become U+FFFD. An incomplete sequence at the end of
    /// the chunk is held back for the next call.
    pub(crate) fn decode_into(&mut self, chunk: &[u8], out: &mut String) {
        if self.partial.is_empty() {
            self.decode_slice(chunk, out);
        } else {
            let mut joined = std::mem::take(&mut self.partial);
            joined.extend_from_slice(chunk);
            self.decode_slice(&joined, out);
        }
    }

    /// Flush the carry at end of stream. A truncated sequence decodes to a
    /// single U+FFFD.
    pub(crate) fn finish(&mut self, out: &mut String) {
        if !self.partial.is_empty() {
            self.partial.clear();
            out.push(char::REPLACEMENT_CHARACTER);
        }
    }

    /// Number of bytes currently held back.
    pub(crate) fn carried(&self) -> usize {
        self.partial.len()
    }

    fn decode_slice(&mut self, mut bytes: &[u8], out: &mut String) {
        loop {
            match std::str::from_utf8(bytes) {
                Ok(text) => {
                    out.push_str(text);
                    return;
                }
                Err(e) => {
                    let (valid, rest) = bytes.split_at(e.valid_up_to());
                    out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            bytes = &rest[len..];
                        }
                        None => {
                            self.partial.extend_from_slice(rest);
                            return;
                        }
                    }
                }
            }
        }
    }
}
