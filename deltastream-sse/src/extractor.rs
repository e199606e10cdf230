//! Delta extraction and accumulation.

use deltastream_types::DeltaSink;

use crate::line::{Payload, StreamLineKind, classify, extract_delta};

/// Result of processing one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Nothing to apply: comment, blank, ignored field, empty payload, a
    /// record without content, or any line after the sentinel.
    Skipped,
    /// A content delta was appended and published.
    Delta(String),
    /// The sentinel was seen. Later lines are skipped.
    Terminal,
    /// The payload is not valid JSON. Nothing was applied; the caller decides
    /// whether to retry it with more input.
    Malformed,
}

impl LineOutcome {
    /// The applied delta, if any.
    pub fn delta(&self) -> Option<&str> {
        match self {
            Self::Delta(delta) => Some(delta),
            _ => None,
        }
    }

    /// Whether this line ended the stream's content.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal)
    }
}

/// Append-only concatenation of every delta of one stream.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Accumulator {
    content: String,
    deltas: usize,
}

impl Accumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a delta and return the new accumulated content.
    pub fn append(&mut self, delta: &str) -> &str {
        self.content.push_str(delta);
        self.deltas += 1;
        &self.content
    }

    /// The accumulated content so far.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Number of deltas appended.
    pub fn deltas(&self) -> usize {
        self.deltas
    }

    /// Consume the accumulator, returning the content.
    pub fn into_content(self) -> String {
        self.content
    }
}

/// Interprets framed lines, applies content deltas and publishes the running
/// total after each one.
#[derive(Debug, Default)]
pub struct DeltaExtractor {
    accumulated: Accumulator,
    terminal: bool,
}

impl DeltaExtractor {
    /// Create an extractor for a new stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one line.
    ///
    /// On a delta the sink receives the full accumulated content exactly once.
    pub fn process<S>(&mut self, line: &str, sink: &mut S) -> LineOutcome
    where
        S: DeltaSink + ?Sized,
    {
        if self.terminal {
            return LineOutcome::Skipped;
        }

        let payload = match classify(line) {
            StreamLineKind::Comment | StreamLineKind::Blank | StreamLineKind::Ignored => {
                return LineOutcome::Skipped;
            }
            StreamLineKind::Data(Payload::Empty) => return LineOutcome::Skipped,
            StreamLineKind::Data(Payload::Sentinel) => {
                self.terminal = true;
                tracing::debug!(deltas = self.accumulated.deltas(), "stream sentinel received");
                return LineOutcome::Terminal;
            }
            StreamLineKind::Data(Payload::Fragment(payload)) => payload,
        };

        match extract_delta(payload) {
            Ok(Some(delta)) => {
                sink.publish(self.accumulated.append(&delta));
                LineOutcome::Delta(delta)
            }
            Ok(None) => LineOutcome::Skipped,
            Err(e) => {
                tracing::trace!(error = %e, len = payload.len(), "data payload did not decode");
                LineOutcome::Malformed
            }
        }
    }

    /// Whether the sentinel has been seen.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// The accumulated content so far.
    pub fn content(&self) -> &str {
        self.accumulated.content()
    }

    /// Number of deltas applied.
    pub fn deltas(&self) -> usize {
        self.accumulated.deltas()
    }

    /// Consume the extractor, returning the accumulator.
    pub fn into_accumulator(self) -> Accumulator {
        self.accumulated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_line(text: &str) -> String {
        format!(
            "data: {}",
            serde_json::json!({"choices": [{"index": 0, "delta": {"content": text}}]})
        )
    }

    #[test]
    fn applies_and_publishes_each_delta() {
        let mut extractor = DeltaExtractor::new();
        let mut published = Vec::new();
        let mut sink = |s: &str| published.push(s.to_owned());

        let first = extractor.process(&content_line("Hello"), &mut sink);
        let second = extractor.process(&content_line(" world"), &mut sink);

        assert_eq!(first.delta(), Some("Hello"));
        assert_eq!(second.delta(), Some(" world"));
        assert_eq!(extractor.content(), "Hello world");
        assert_eq!(extractor.deltas(), 2);
        assert_eq!(published, vec!["Hello", "Hello world"]);
    }

    #[test]
    fn trailing_carriage_return_gives_identical_delta() {
        let line = content_line("same");
        let mut a = DeltaExtractor::new();
        let mut b = DeltaExtractor::new();
        let mut sink = |_: &str| {};
        assert_eq!(
            a.process(&line, &mut sink),
            b.process(&format!("{line}\r"), &mut sink)
        );
        assert_eq!(a.content(), b.content());
    }

    #[test]
    fn record_without_content_does_not_publish() {
        let mut extractor = DeltaExtractor::new();
        let mut calls = 0;
        let mut sink = |_: &str| calls += 1;
        let outcome = extractor.process(r#"data: {"choices":[{"delta":{}}]}"#, &mut sink);
        assert_eq!(outcome, LineOutcome::Skipped);
        assert_eq!(calls, 0);
    }

    #[test]
    fn comments_blanks_and_other_fields_are_skipped() {
        let mut extractor = DeltaExtractor::new();
        let mut published = Vec::new();
        let mut sink = |s: &str| published.push(s.to_owned());
        for line in [": keepalive", "", "  ", "event: delta", "id: 3", "data: "] {
            assert_eq!(extractor.process(line, &mut sink), LineOutcome::Skipped, "{line:?}");
        }
        assert!(!extractor.is_terminal());
        assert!(published.is_empty());
    }

    #[test]
    fn sentinel_stops_further_content() {
        let mut extractor = DeltaExtractor::new();
        let mut published = Vec::new();
        let mut sink = |s: &str| published.push(s.to_owned());

        extractor.process(&content_line("a"), &mut sink);
        assert!(extractor.process("data: [DONE]", &mut sink).is_terminal());
        assert_eq!(extractor.process(&content_line("b"), &mut sink), LineOutcome::Skipped);
        assert_eq!(extractor.process("data: [DONE]", &mut sink), LineOutcome::Skipped);

        assert!(extractor.is_terminal());
        assert_eq!(extractor.content(), "a");
        assert_eq!(published, vec!["a"]);
    }

    #[test]
    fn malformed_payload_applies_nothing() {
        let mut extractor = DeltaExtractor::new();
        let mut published = Vec::new();
        let mut sink = |s: &str| published.push(s.to_owned());
        let outcome = extractor.process(r#"data: {"choices":[{"delta":{"content":"Hel"#, &mut sink);
        assert_eq!(outcome, LineOutcome::Malformed);
        assert_eq!(extractor.content(), "");
        assert!(published.is_empty());
    }

    #[test]
    fn accumulator_counts_and_returns_running_total() {
        let mut acc = Accumulator::new();
        assert_eq!(acc.append("x"), "x");
        assert_eq!(acc.append("yz"), "xyz");
        assert_eq!(acc.deltas(), 2);
        assert_eq!(acc.into_content(), "xyz");
    }
}
