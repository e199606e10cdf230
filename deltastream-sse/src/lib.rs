//! Incremental event-stream decoder for streamed chat completions.
//!
//! The remote service answers with a line-oriented event stream:
//!
//! ```text
//! : keepalive
//! data: {"choices":[{"delta":{"content":"Hel"}}]}
//! data: {"choices":[{"delta":{"content":"lo"}}]}
//! data: [DONE]
//! ```
//!
//! The transport delivers that text in arbitrary chunks. [`LineFramer`] turns
//! chunks into lines (decoding UTF-8 across chunk boundaries),
//! [`DeltaExtractor`] applies each `choices[0].delta.content` to a running
//! [`Accumulator`] and publishes the new total to a
//! [`DeltaSink`](deltastream_types::DeltaSink). [`StreamDecoder`] ties the two
//! together for one stream, and [`drive`] / [`updates`] run it over any
//! `Stream` of byte chunks.
//!
//! A record cut by a line-feed inside its JSON is not lost: it is put back
//! and merged with the next line once more input arrives. Records that are
//! still malformed when the stream ends are dropped.
//!
//! # Usage
//!
//! ```
//! # async fn run() -> Result<(), std::convert::Infallible> {
//! use futures::stream;
//!
//! let chunks = stream::iter([
//!     Ok::<_, std::convert::Infallible>("data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n"),
//!     Ok("data: [DONE]\n"),
//! ]);
//!
//! let mut shown = String::new();
//! let completion = deltastream_sse::drive(chunks, &mut |s: &str| shown = s.to_owned()).await?;
//! assert_eq!(completion.content, "Hi");
//! assert_eq!(shown, "Hi");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod decoder;
pub mod extractor;
pub mod framer;
pub mod line;
pub mod streaming;
mod utf8;

pub use config::{DecoderConfig, Recovery};
pub use decoder::{Progress, StreamDecoder};
pub use extractor::{Accumulator, DeltaExtractor, LineOutcome};
pub use framer::{LineFramer, Lines};
pub use line::{DATA_PREFIX, DONE_SENTINEL, Payload, StreamLineKind, classify, extract_delta};
pub use streaming::{drive, drive_with, updates, updates_with};

// Re-export deltastream-types for convenience
pub use deltastream_types::{Completion, CompletionReason, DeltaSink, StreamUpdate};
