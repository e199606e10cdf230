//! Incremental decoder: framer plus extractor for one stream.

use deltastream_types::{Completion, CompletionReason, DeltaSink};

use crate::config::{DecoderConfig, Recovery};
use crate::extractor::{DeltaExtractor, LineOutcome};
use crate::framer::LineFramer;
use crate::line::{Payload, StreamLineKind, classify, extract_delta};

/// Whether the decoder wants more input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Keep feeding chunks.
    Continue,
    /// The sentinel was seen; further chunks are ignored.
    Done,
}

/// Rebuilds the accumulated answer of one stream from its chunks.
///
/// Create one per exchange: the pending buffer and the accumulated content
/// belong to a single stream.
///
/// ```
/// use deltastream_sse::{Progress, StreamDecoder};
///
/// let mut published = Vec::new();
/// let mut sink = |s: &str| published.push(s.to_owned());
///
/// let mut decoder = StreamDecoder::new();
/// decoder.feed(br#"data: {"choices":[{"delta":{"content":"Hel"#, &mut sink);
/// let progress = decoder.feed(b"lo\"}}]}\n\ndata: [DONE]\n", &mut sink);
/// assert_eq!(progress, Progress::Done);
///
/// let completion = decoder.finish(&mut sink);
/// assert_eq!(completion.content, "Hello");
/// assert_eq!(published, vec!["Hello"]);
/// ```
#[derive(Debug, Default)]
pub struct StreamDecoder {
    config: DecoderConfig,
    framer: LineFramer,
    extractor: DeltaExtractor,
}

impl StreamDecoder {
    /// Create a decoder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with the given configuration.
    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            config,
            framer: LineFramer::new(),
            extractor: DeltaExtractor::new(),
        }
    }

    /// Decode one chunk, publishing every delta it completes.
    ///
    /// A record that fails to decode is put back and the rest of this chunk's
    /// lines wait for the next call (see [`Recovery::Rebuffer`]), unless the
    /// next line already starts a record of its own.
    pub fn feed<S>(&mut self, chunk: &[u8], sink: &mut S) -> Progress
    where
        S: DeltaSink + ?Sized,
    {
        if self.extractor.is_terminal() {
            return Progress::Done;
        }
        self.framer.push(chunk);
        self.drain(sink, false);
        self.progress()
    }

    /// End the stream: flush the pending buffer, signal the sink and return
    /// the final state.
    ///
    /// The trailing unterminated line goes through the same rules as any
    /// other line. Records still malformed at this point are dropped. Nothing
    /// is flushed if the sentinel was already seen.
    pub fn finish<S>(mut self, sink: &mut S) -> Completion
    where
        S: DeltaSink + ?Sized,
    {
        if !self.extractor.is_terminal() {
            // Complete lines deferred behind a held record get one more
            // chance to merge, then the unterminated tail gets its line-feed.
            self.drain(sink, true);
            if !self.extractor.is_terminal()
                && self.framer.buffered_bytes() > self.framer.held_len()
            {
                self.framer.push(b"\n");
                self.drain(sink, true);
            }
            let rest = self.framer.finish();
            if !rest.is_empty() {
                tracing::trace!(lines = rest.len(), "flushing pending buffer");
            }
            for line in rest {
                match self.extractor.process(&line, sink) {
                    LineOutcome::Terminal => break,
                    LineOutcome::Malformed => {
                        tracing::debug!(len = line.len(), "dropping malformed record at end of stream");
                    }
                    LineOutcome::Skipped | LineOutcome::Delta(_) => {}
                }
            }
        } else if self.framer.buffered_bytes() > 0 {
            tracing::trace!(
                bytes = self.framer.buffered_bytes(),
                "discarding input after sentinel"
            );
        }

        let reason = if self.extractor.is_terminal() {
            CompletionReason::Sentinel
        } else {
            CompletionReason::SourceEnded
        };
        let accumulated = self.extractor.into_accumulator();
        let completion = Completion {
            reason,
            deltas: accumulated.deltas(),
            content: accumulated.into_content(),
        };
        sink.complete(&completion);
        completion
    }

    /// The accumulated content so far.
    pub fn content(&self) -> &str {
        self.extractor.content()
    }

    /// Number of deltas applied so far.
    pub fn deltas(&self) -> usize {
        self.extractor.deltas()
    }

    /// Whether the sentinel has been seen.
    pub fn is_terminal(&self) -> bool {
        self.extractor.is_terminal()
    }

    /// Text buffered but not yet resolved into a line.
    pub fn pending(&self) -> &str {
        self.framer.pending()
    }

    fn progress(&self) -> Progress {
        if self.extractor.is_terminal() {
            Progress::Done
        } else {
            Progress::Continue
        }
    }

    /// Process complete lines until the buffer runs dry, the sentinel shows
    /// up, or (unless `merge_now`) a fresh record is put back for more input.
    fn drain<S>(&mut self, sink: &mut S, merge_now: bool)
    where
        S: DeltaSink + ?Sized,
    {
        loop {
            let held = self.framer.held_len();
            let Some(line) = self.framer.next_line() else {
                return;
            };

            let (record, fresh) = if held == 0 {
                (line, true)
            } else {
                let (head, segment) = line.split_at(held);
                let head = &head[..held - 1];
                match resolve_held(head, segment) {
                    Resolution::Join(record) => (record, false),
                    Resolution::Replace => {
                        tracing::debug!(len = head.len(), "dropping held record, a new record started");
                        (segment.to_owned(), true)
                    }
                    Resolution::Keep => {
                        self.framer.unread(head.to_owned());
                        continue;
                    }
                    Resolution::Abandon => {
                        tracing::debug!(len = head.len(), "dropping held record at end of event");
                        continue;
                    }
                }
            };

            match self.extractor.process(&record, sink) {
                LineOutcome::Terminal => return,
                LineOutcome::Malformed => {
                    if self.config.recovery == Recovery::Skip {
                        tracing::debug!(len = record.len(), "skipping malformed record");
                        continue;
                    }
                    if record.len() > self.config.max_held_bytes {
                        tracing::warn!(
                            len = record.len(),
                            limit = self.config.max_held_bytes,
                            "malformed record exceeded hold limit, dropping it"
                        );
                        continue;
                    }
                    self.framer.unread(record);
                    tracing::trace!(held = self.framer.held_len(), "re-buffered malformed record");
                    if fresh && !merge_now && !self.framer.peek_line().is_some_and(starts_record) {
                        return;
                    }
                }
                LineOutcome::Skipped | LineOutcome::Delta(_) => {}
            }
        }
    }
}

/// What to do with a held record once the next line arrives.
#[derive(Debug, PartialEq, Eq)]
enum Resolution {
    /// Decode this merged text in place of the held record.
    Join(String),
    /// Drop the held record and decode the new line on its own.
    Replace,
    /// Skip the new line and keep holding.
    Keep,
    /// Drop the held record; the new line carries nothing.
    Abandon,
}

fn resolve_held(head: &str, segment: &str) -> Resolution {
    if starts_record(segment) {
        return Resolution::Replace;
    }
    // A raw line-feed is not allowed inside a JSON string; put it back escaped.
    if ends_inside_string(head) {
        return Resolution::Join(format!("{head}\\n{segment}"));
    }
    match classify(segment) {
        StreamLineKind::Blank => Resolution::Abandon,
        StreamLineKind::Comment => Resolution::Keep,
        StreamLineKind::Data(_) => Resolution::Replace,
        StreamLineKind::Ignored => Resolution::Join(format!("{head}\n{segment}")),
    }
}

/// Whether `line` is a sentinel or a data record that decodes on its own.
fn starts_record(line: &str) -> bool {
    match classify(line) {
        StreamLineKind::Data(Payload::Sentinel) => true,
        StreamLineKind::Data(Payload::Fragment(payload)) => extract_delta(payload).is_ok(),
        _ => false,
    }
}

/// Whether `text` stops inside an unterminated JSON string literal.
fn ends_inside_string(text: &str) -> bool {
    let mut inside = false;
    let mut escaped = false;
    for c in text.chars() {
        if escaped {
            escaped = false;
        } else if inside && c == '\\' {
            escaped = true;
        } else if c == '"' {
            inside = !inside;
        }
    }
    inside
}
