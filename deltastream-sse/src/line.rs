//! Event-stream line grammar.
//!
//! ```text
//! : keepalive comment
//! data: {"choices":[{"delta":{"content":"Hel"}}]}
//! data: {"choices":[{"delta":{"content":"lo"}}]}
//! data: [DONE]
//! ```

/// Field prefix of a data record.
pub const DATA_PREFIX: &str = "data: ";

/// Payload that ends the content of a stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Classification of one framed line. Variants are checked in declaration
/// order; the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamLineKind<'a> {
    /// Starts with `:`.
    Comment,
    /// Empty after trimming.
    Blank,
    /// Starts with [`DATA_PREFIX`].
    Data(Payload<'a>),
    /// Anything else, e.g. `event:` or `id:` fields.
    Ignored,
}

/// The trimmed payload of a data record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    /// [`DONE_SENTINEL`].
    Sentinel,
    /// Nothing after the prefix.
    Empty,
    /// An encoded JSON value, not yet decoded.
    Fragment(&'a str),
}

/// Classify a line. A trailing `\r` is ignored.
pub fn classify(line: &str) -> StreamLineKind<'_> {
    let line = line.strip_suffix('\r').unwrap_or(line);

    if line.starts_with(':') {
        return StreamLineKind::Comment;
    }
    if line.trim().is_empty() {
        return StreamLineKind::Blank;
    }
    let Some(rest) = line.strip_prefix(DATA_PREFIX) else {
        return StreamLineKind::Ignored;
    };

    let payload = rest.trim();
    StreamLineKind::Data(if payload == DONE_SENTINEL {
        Payload::Sentinel
    } else if payload.is_empty() {
        Payload::Empty
    } else {
        Payload::Fragment(payload)
    })
}

/// Decode a payload and pull out `choices[0].delta.content`.
///
/// Returns `Ok(None)` when the field is missing, not a string, or empty
/// (role-only and finish-reason-only records). Returns `Err` only when the
/// payload is not valid JSON.
pub fn extract_delta(payload: &str) -> Result<Option<String>, serde_json::Error> {
    let json: serde_json::Value = serde_json::from_str(payload)?;
    Ok(json["choices"][0]["delta"]["content"]
        .as_str()
        .filter(|content| !content.is_empty())
        .map(str::to_owned))
}
