//! Error types for all deltastream crates.

/// Errors from a chat exchange.
///
/// Only transport-level problems end up here. Malformed stream records are
/// handled inside the decoder and never surface as errors.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    // Retryable errors
    /// Network-level error (connection reset, DNS failure, body read failure).
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The chat function rejected the request with HTTP 429.
    #[error("rate limited")]
    RateLimited,
    /// The chat function is temporarily unavailable.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    // Terminal errors
    /// The account has no credits left (HTTP 402).
    #[error("credits required")]
    CreditsRequired,
    /// Authentication/authorization failure.
    #[error("authentication failed: {0}")]
    Authentication(String),
    /// Any other non-success response.
    #[error("request failed with HTTP {status}: {body}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },
    /// The response body failed while it was being streamed. Content
    /// published before the failure stays with the sink.
    #[error("stream error: {0}")]
    Stream(String),
    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ChatError {
    /// Whether this error is likely transient and the request can be retried.
    ///
    /// Retrying is left to the caller; nothing in deltastream retries.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::RateLimited | Self::ServiceUnavailable(_)
        )
    }
}
