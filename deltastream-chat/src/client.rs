//! Chat function client struct and builder.

use deltastream_sse::{DecoderConfig, drive_with, updates_with};
use deltastream_types::{ChatError, ChatMessage, Completion, StreamHandle};
use futures::StreamExt;
use serde::Serialize;

use crate::config::{ChatConfig, DEFAULT_FUNCTION};
use crate::conversation::Conversation;
use crate::error::{map_http_status, map_reqwest_error};

/// Request body expected by the chat function.
#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [ChatMessage],
}

/// Client for a hosted chat function that answers with an event stream.
///
/// # Example
///
/// ```no_run
/// use deltastream_chat::{ChatClient, Conversation};
///
/// # async fn run() -> Result<(), deltastream_chat::ChatError> {
/// let client = ChatClient::new("anon-key").base_url("https://abc.supabase.co");
/// let mut conversation = Conversation::new();
/// client.send(&mut conversation, "What is a pulsar?").await?;
/// println!("{}", conversation.last().map(|m| m.content.as_str()).unwrap_or(""));
/// # Ok(())
/// # }
/// ```
pub struct ChatClient {
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) function: String,
    pub(crate) decoder: DecoderConfig,
    /// Shared HTTP client.
    pub(crate) client: reqwest::Client,
}

impl ChatClient {
    /// Create a client with the default function and decoder settings.
    ///
    /// The base URL starts empty; set it with [`base_url`](Self::base_url).
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: String::new(),
            function: DEFAULT_FUNCTION.into(),
            decoder: DecoderConfig::default(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client from a loaded [`ChatConfig`].
    #[must_use]
    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(config.api_key.clone())
            .base_url(config.base_url.clone())
            .function(config.function.clone())
            .decoder_config(config.decoder.clone())
    }

    /// Override the project base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the function name.
    #[must_use]
    pub fn function(mut self, name: impl Into<String>) -> Self {
        self.function = name.into();
        self
    }

    /// Override the stream decoder settings.
    #[must_use]
    pub fn decoder_config(mut self, config: DecoderConfig) -> Self {
        self.decoder = config;
        self
    }

    /// The endpoint requests are posted to.
    pub fn function_url(&self) -> String {
        format!(
            "{}/functions/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.function
        )
    }

    /// Send `input` as the next user message and stream the answer into
    /// `conversation`.
    ///
    /// Blank input is ignored and returns `Ok(None)` without a request.
    /// Otherwise the user message is appended, the whole conversation is
    /// posted, and every decoded snapshot replaces the trailing assistant
    /// message.
    ///
    /// # Errors
    ///
    /// Non-success statuses map to [`ChatError::RateLimited`],
    /// [`ChatError::CreditsRequired`] and friends. A body failure while
    /// streaming returns [`ChatError::Stream`]; content published before it
    /// stays in the conversation.
    pub async fn send(
        &self,
        conversation: &mut Conversation,
        input: &str,
    ) -> Result<Option<Completion>, ChatError> {
        if input.trim().is_empty() {
            return Ok(None);
        }

        conversation.push_user(input);
        let response = self.post(conversation.messages()).await?;

        let completion = drive_with(self.decoder.clone(), response.bytes_stream(), conversation)
            .await
            .map_err(map_reqwest_error)?;

        tracing::debug!(
            reason = ?completion.reason,
            deltas = completion.deltas,
            "chat stream finished"
        );
        Ok(Some(completion))
    }

    /// Post `messages` and return the answer as a stream of updates.
    ///
    /// The request is sent and its status checked before this returns; the
    /// body is decoded as the returned handle is polled.
    ///
    /// # Errors
    ///
    /// Same status mapping as [`send`](Self::send).
    pub async fn complete_stream(&self, messages: &[ChatMessage]) -> Result<StreamHandle, ChatError> {
        let response = self.post(messages).await?;
        let stream = updates_with(self.decoder.clone(), response.bytes_stream())
            .map(|update| update.map_err(map_reqwest_error));
        Ok(StreamHandle {
            receiver: Box::pin(stream),
        })
    }

    async fn post(&self, messages: &[ChatMessage]) -> Result<reqwest::Response, ChatError> {
        let url = self.function_url();
        tracing::debug!(url = %url, messages = messages.len(), "sending chat request");

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&ChatRequest { messages })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(map_reqwest_error)?;
            tracing::debug!(status = status.as_u16(), "chat request rejected");
            return Err(map_http_status(status, &body));
        }

        Ok(response)
    }
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("base_url", &self.base_url)
            .field("function", &self.function)
            .field("decoder", &self.decoder)
            .finish_non_exhaustive()
    }
}
