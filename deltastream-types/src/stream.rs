//! Publish contract between the stream decoder and whoever displays or stores
//! the growing answer.

use std::pin::Pin;

use futures::Stream;
use futures::channel::mpsc::UnboundedSender;

use crate::error::ChatError;

/// Why a stream stopped producing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReason {
    /// The `[DONE]` sentinel was observed.
    Sentinel,
    /// The chunk source ended without a sentinel.
    SourceEnded,
}

/// Final state of one decoded stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// What ended the stream.
    pub reason: CompletionReason,
    /// The full accumulated content.
    pub content: String,
    /// Number of deltas applied (equals the number of publishes).
    pub deltas: usize,
}

/// An observable step of a stream, for consumers that prefer a channel or a
/// `Stream` over callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamUpdate {
    /// The accumulated content after a delta was applied.
    Content(String),
    /// The stream finished.
    Complete(Completion),
}

/// Handle to an in-flight chat stream.
pub struct StreamHandle {
    /// The stream of updates. Consume with `StreamExt::next()`.
    ///
    /// Ends after [`StreamUpdate::Complete`], or after the first `Err`.
    pub receiver: Pin<Box<dyn Stream<Item = Result<StreamUpdate, ChatError>> + Send>>,
}

/// Receives the accumulated content after every applied delta.
///
/// `publish` is called synchronously from the decoding loop, exactly once per
/// delta and always with the full accumulated text, never a fragment.
/// `complete` is called once when the stream ends normally; it is not called
/// when the transport fails.
pub trait DeltaSink {
    /// Deliver a snapshot of the accumulated content.
    fn publish(&mut self, accumulated: &str);

    /// Signal that no more content will be published for this stream.
    fn complete(&mut self, completion: &Completion) {
        let _ = completion;
    }
}

impl<F> DeltaSink for F
where
    F: FnMut(&str),
{
    fn publish(&mut self, accumulated: &str) {
        self(accumulated)
    }
}

/// Forwards snapshots to a channel. A dropped receiver is not an error: the
/// stream keeps decoding and the updates are discarded.
impl DeltaSink for UnboundedSender<StreamUpdate> {
    fn publish(&mut self, accumulated: &str) {
        let _ = self.unbounded_send(StreamUpdate::Content(accumulated.to_owned()));
    }

    fn complete(&mut self, completion: &Completion) {
        let _ = self.unbounded_send(StreamUpdate::Complete(completion.clone()));
    }
}
