//! Shared types for the deltastream crates.
//!
//! - [`ChatMessage`] and [`Role`]: the conversation entries posted to the chat
//!   function and rebuilt from its stream.
//! - [`DeltaSink`]: the publish capability the decoder calls after every
//!   content delta, plus the completion signal.
//! - [`Completion`] and [`StreamUpdate`]: what a finished or in-flight stream
//!   reports.
//! - [`ChatError`]: transport and request failures.

pub mod error;
pub mod stream;
pub mod types;

pub use error::*;
pub use stream::*;
pub use types::*;
