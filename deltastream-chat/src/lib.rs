//! Client for a hosted chat function that streams its answer as an event
//! stream.
//!
//! [`ChatClient::send`] appends the user's message to a [`Conversation`],
//! posts the whole conversation and decodes the response with
//! [`deltastream_sse`], growing the trailing assistant message as deltas
//! arrive. [`ChatClient::complete_stream`] exposes the same answer as a
//! stream of updates instead.
//!
//! Configuration comes from [`ChatConfig::from_env`] or any `serde` source.

pub mod client;
pub mod config;
pub mod conversation;
pub(crate) mod error;

pub use client::ChatClient;
pub use config::ChatConfig;
pub use conversation::Conversation;

// Re-export deltastream-types for convenience
pub use deltastream_types::{
    ChatError, ChatMessage, Completion, CompletionReason, Role, StreamHandle, StreamUpdate,
};
