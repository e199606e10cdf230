//! The message list a chat session keeps, and how streamed answers land in it.

use deltastream_types::{ChatMessage, DeltaSink, Role};
use serde::{Deserialize, Serialize};

/// Ordered list of user and assistant messages.
///
/// As a [`DeltaSink`], each published snapshot becomes the content of the
/// trailing assistant message, so the answer grows in place while streaming.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// An empty conversation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user message.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    /// All messages, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The most recent message.
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether no message has been added yet.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl From<Vec<ChatMessage>> for Conversation {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }
}

impl DeltaSink for Conversation {
    fn publish(&mut self, accumulated: &str) {
        match self.messages.last_mut() {
            Some(last) if last.role == Role::Assistant => {
                last.content.clear();
                last.content.push_str(accumulated);
            }
            _ => self.messages.push(ChatMessage::assistant(accumulated)),
        }
    }
}
