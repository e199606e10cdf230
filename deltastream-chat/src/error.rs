//! Internal error helpers for mapping HTTP/reqwest errors to [`ChatError`].

use deltastream_types::ChatError;

/// Map a non-success HTTP status from the chat function to a [`ChatError`].
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> ChatError {
    match status.as_u16() {
        429 => ChatError::RateLimited,
        402 => ChatError::CreditsRequired,
        401 | 403 => ChatError::Authentication(body.to_string()),
        500 | 502 | 503 => ChatError::ServiceUnavailable(body.to_string()),
        code => ChatError::RequestFailed {
            status: code,
            body: body.to_string(),
        },
    }
}

/// Map a [`reqwest::Error`] to a [`ChatError`].
///
/// Errors raised while building the request (bad URL, bad header value) are
/// configuration problems. Failures reading the response body surface as
/// [`ChatError::Stream`]; everything else is treated as network failure.
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ChatError {
    if err.is_builder() {
        ChatError::Config(err.to_string())
    } else if err.is_body() || err.is_decode() {
        ChatError::Stream(err.to_string())
    } else {
        ChatError::Network(Box::new(err))
    }
}
