//! Client configuration, from the environment or from a deserialized file.

use std::fmt;

use deltastream_sse::DecoderConfig;
use deltastream_types::ChatError;
use serde::Deserialize;

/// Environment variable holding the project base URL.
pub const BASE_URL_VAR: &str = "DELTASTREAM_BASE_URL";

/// Environment variable holding the bearer key.
pub const API_KEY_VAR: &str = "DELTASTREAM_API_KEY";

/// Environment variable overriding the function name.
pub const FUNCTION_VAR: &str = "DELTASTREAM_FUNCTION";

/// Function invoked when none is configured.
pub const DEFAULT_FUNCTION: &str = "cosmic-chat";

/// Everything a [`ChatClient`](crate::ChatClient) needs to reach the chat
/// function.
#[derive(Clone, Deserialize)]
pub struct ChatConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`.
    pub base_url: String,
    /// Bearer key sent with every request.
    pub api_key: String,
    /// Name of the function under `/functions/v1/`.
    #[serde(default = "default_function")]
    pub function: String,
    /// Stream decoder settings.
    #[serde(default)]
    pub decoder: DecoderConfig,
}

fn default_function() -> String {
    DEFAULT_FUNCTION.to_string()
}

impl ChatConfig {
    /// Build a config with the default function and decoder settings.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            function: default_function(),
            decoder: DecoderConfig::default(),
        }
    }

    /// Read the config from `DELTASTREAM_BASE_URL`, `DELTASTREAM_API_KEY`
    /// and the optional `DELTASTREAM_FUNCTION`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Config`] if a required variable is missing or
    /// empty.
    pub fn from_env() -> Result<Self, ChatError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ChatError> {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ChatError::Config(format!("environment variable {name} is not set")))
        };

        let mut config = Self::new(required(BASE_URL_VAR)?, required(API_KEY_VAR)?);
        if let Some(function) = lookup(FUNCTION_VAR).filter(|f| !f.trim().is_empty()) {
            config.function = function;
        }
        Ok(config)
    }
}

impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("function", &self.function)
            .field("decoder", &self.decoder)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn reads_required_vars_and_defaults_function() {
        let config = ChatConfig::from_lookup(lookup_from(&[
            (BASE_URL_VAR, "https://abc.supabase.co"),
            (API_KEY_VAR, "anon-key"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://abc.supabase.co");
        assert_eq!(config.api_key, "anon-key");
        assert_eq!(config.function, DEFAULT_FUNCTION);
        assert_eq!(config.decoder, DecoderConfig::default());
    }

    #[test]
    fn function_override() {
        let config = ChatConfig::from_lookup(lookup_from(&[
            (BASE_URL_VAR, "https://abc.supabase.co"),
            (API_KEY_VAR, "anon-key"),
            (FUNCTION_VAR, "other-chat"),
        ]))
        .unwrap();
        assert_eq!(config.function, "other-chat");
    }

    #[test]
    fn missing_key_is_config_error() {
        let err = ChatConfig::from_lookup(lookup_from(&[(BASE_URL_VAR, "https://x")])).unwrap_err();
        match err {
            ChatError::Config(msg) => assert!(msg.contains(API_KEY_VAR), "{msg}"),
            other => panic!("expected Config, got {other:?}"),
        }
    }

    #[test]
    fn blank_base_url_is_config_error() {
        let err = ChatConfig::from_lookup(lookup_from(&[
            (BASE_URL_VAR, "  "),
            (API_KEY_VAR, "anon-key"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = ChatConfig::new("https://x", "super-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: ChatConfig = serde_json::from_str(
            r#"{"base_url":"https://x","api_key":"k","decoder":{"max_held_bytes":64}}"#,
        )
        .unwrap();
        assert_eq!(config.function, DEFAULT_FUNCTION);
        assert_eq!(config.decoder.max_held_bytes, 64);
    }
}
