//! Line framing over arbitrarily split chunks.

use crate::utf8::Utf8Carry;

/// Splits a chunked byte stream into `\n`-terminated lines.
///
/// Text that has not yet seen its line-feed stays in the pending buffer until
/// a later chunk completes it. A trailing `\r` is stripped from every line.
///
/// A line handed back through [`LineFramer::unread`] is re-inserted at the
/// front of the buffer and *held*: the next search for a line-feed starts
/// after it, so the following line is merged onto it. This is how a record
/// that was cut by a line-feed inside its encoded value gets a second chance
/// once more input arrives.
#[derive(Debug, Default)]
pub struct LineFramer {
    utf8: Utf8Carry,
    buffer: String,
    held: usize,
}

impl LineFramer {
    /// Create an empty framer. Use one per stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and iterate over the lines it completes.
    ///
    /// Lines not consumed from the iterator stay buffered and are returned by
    /// the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Lines<'_> {
        self.push(chunk);
        Lines { framer: self }
    }

    /// Append a chunk without extracting any lines.
    pub fn push(&mut self, chunk: &[u8]) {
        self.utf8.decode_into(chunk, &mut self.buffer);
    }

    /// Remove and return the next complete line, if the buffer holds one.
    pub fn next_line(&mut self) -> Option<String> {
        let pos = self.held + self.buffer[self.held..].find('\n')?;
        let raw = &self.buffer[..pos];
        let line = raw.strip_suffix('\r').unwrap_or(raw).to_owned();
        self.buffer.drain(..=pos);
        self.held = 0;
        Some(line)
    }

    /// Put the most recently returned line back at the front of the buffer,
    /// line-feed restored, and hold it for merging with the next line.
    pub fn unread(&mut self, line: String) {
        let mut restored = line;
        restored.push('\n');
        self.held = restored.len();
        restored.push_str(&self.buffer);
        self.buffer = restored;
    }

    /// The next complete line after the held prefix, without consuming it.
    pub fn peek_line(&self) -> Option<&str> {
        let rest = &self.buffer[self.held..];
        let line = &rest[..rest.find('\n')?];
        Some(line.strip_suffix('\r').unwrap_or(line))
    }

    /// Text received but not yet returned as a line.
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// Length of the held prefix of the pending buffer, 0 when nothing is held.
    pub fn held_len(&self) -> usize {
        self.held
    }

    /// Bytes buffered in any form, including an unfinished UTF-8 sequence.
    pub fn buffered_bytes(&self) -> usize {
        self.buffer.len() + self.utf8.carried()
    }

    /// Flush everything at end of stream.
    ///
    /// The remainder is split on `\n` regardless of holds; empty lines are
    /// dropped. The framer is empty afterwards.
    pub fn finish(&mut self) -> Vec<String> {
        self.utf8.finish(&mut self.buffer);
        self.held = 0;
        let rest = std::mem::take(&mut self.buffer);
        rest.split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

/// Draining iterator over the complete lines of a [`LineFramer`].
pub struct Lines<'a> {
    framer: &'a mut LineFramer,
}

impl Lines<'_> {
    /// See [`LineFramer::unread`]. Callers should stop iterating afterwards.
    pub fn unread(&mut self, line: String) {
        self.framer.unread(line);
    }
}

impl Iterator for Lines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.framer.next_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_complete_lines_and_keeps_remainder() {
        let mut framer = LineFramer::new();
        let lines: Vec<String> = framer.feed(b"one\ntwo\nthr").collect();
        assert_eq!(lines, vec!["one", "two"]);
        assert_eq!(framer.pending(), "thr");

        let lines: Vec<String> = framer.feed(b"ee\n").collect();
        assert_eq!(lines, vec!["three"]);
        assert_eq!(framer.pending(), "");
    }

    #[test]
    fn strips_one_trailing_carriage_return() {
        let mut framer = LineFramer::new();
        let lines: Vec<String> = framer.feed(b"a\r\nb\r\r\n\r\n").collect();
        assert_eq!(lines, vec!["a", "b\r", ""]);
    }

    #[test]
    fn crlf_split_between_chunks() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.feed(b"data: x\r").count(), 0);
        let lines: Vec<String> = framer.feed(b"\n").collect();
        assert_eq!(lines, vec!["data: x"]);
    }

    #[test]
    fn multibyte_character_split_inside_line() {
        let mut framer = LineFramer::new();
        let bytes = "naïve\n".as_bytes();
        assert_eq!(framer.feed(&bytes[..3]).count(), 0);
        let lines: Vec<String> = framer.feed(&bytes[3..]).collect();
        assert_eq!(lines, vec!["naïve"]);
    }

    #[test]
    fn unread_line_is_merged_with_the_next_one() {
        let mut framer = LineFramer::new();
        let first = framer.feed(b"data: {\"a\":\n").next().unwrap();
        framer.unread(first);
        assert_eq!(framer.held_len(), "data: {\"a\":\n".len());
        assert_eq!(framer.next_line(), None);

        let lines: Vec<String> = framer.feed(b"1}\nnext\n").collect();
        assert_eq!(lines, vec!["data: {\"a\":\n1}", "next"]);
        assert_eq!(framer.held_len(), 0);
    }

    #[test]
    fn unread_through_iterator_stops_the_batch() {
        let mut framer = LineFramer::new();
        let mut lines = framer.feed(b"bad\nrest\n");
        let first = lines.next().unwrap();
        lines.unread(first);
        assert_eq!(framer.pending(), "bad\nrest\n");
        assert_eq!(framer.next_line().as_deref(), Some("bad\nrest"));
    }

    #[test]
    fn peek_looks_past_the_held_prefix() {
        let mut framer = LineFramer::new();
        framer.push(b"data: {\"a\":\n");
        let held = framer.next_line().unwrap();
        framer.unread(held);
        assert_eq!(framer.peek_line(), None);

        framer.push(b"data: [DONE]\r\n");
        assert_eq!(framer.peek_line(), Some("data: [DONE]"));
        assert_eq!(framer.held_len(), "data: {\"a\":\n".len());
    }

    #[test]
    fn finish_flushes_remainder_split_on_newlines() {
        let mut framer = LineFramer::new();
        framer.push(b"held\n");
        let held = framer.next_line().unwrap();
        framer.unread(held);
        framer.push(b"tail\r\n\nlast");
        assert_eq!(framer.finish(), vec!["held", "tail", "last"]);
        assert_eq!(framer.pending(), "");
        assert_eq!(framer.held_len(), 0);
    }

    #[test]
    fn finish_replaces_truncated_character() {
        let mut framer = LineFramer::new();
        framer.push(&"é".as_bytes()[..1]);
        assert_eq!(framer.buffered_bytes(), 1);
        assert_eq!(framer.finish(), vec!["\u{FFFD}"]);
        assert_eq!(framer.buffered_bytes(), 0);
    }
}
