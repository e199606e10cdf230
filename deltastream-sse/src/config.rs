//! Decoder configuration.

use serde::Deserialize;

/// Default upper bound for a held (re-merged) record: 1 MiB.
pub const DEFAULT_MAX_HELD_BYTES: usize = 1_048_576;

/// What to do with a data record whose payload fails to decode mid-stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recovery {
    /// Put the line back, stop the current batch and retry it merged with
    /// the next line once more input arrives.
    #[default]
    Rebuffer,
    /// Drop the line and keep going.
    Skip,
}

/// Static configuration for a [`StreamDecoder`](crate::StreamDecoder).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Handling of malformed records during streaming. At the end-of-stream
    /// flush malformed records are always dropped.
    pub recovery: Recovery,

    /// Largest record kept for re-merging. When a held record grows past
    /// this, its first line is dropped and the rest is framed again.
    pub max_held_bytes: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            recovery: Recovery::Rebuffer,
            max_held_bytes: DEFAULT_MAX_HELD_BYTES,
        }
    }
}
