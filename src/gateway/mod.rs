//! Completion gateway abstraction
//!
//! This module defines the interface to the hosted LLM gateway: the message
//! types sent upstream and the [`CompletionGateway`] trait the HTTP layer
//! relays through. The OpenAI-compatible implementation lives in
//! [`openai`].

use crate::error::Result;
use crate::models::ModelId;
use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

pub mod openai;

pub use openai::OpenAiGateway;

/// Message structure for a chat conversation
///
/// Represents one turn of the conversation sent to the gateway. Roles follow
/// the OpenAI-compatible wire format: `system`, `user`, or `assistant`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use chatrelay::gateway::Message;
    ///
    /// let msg = Message::user("Hello!");
    /// assert_eq!(msg.role, "user");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// Stream of assistant text fragments produced by a completion
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Trait for streaming completion gateways
///
/// The server holds the gateway behind this trait so tests can substitute a
/// mock and so the upstream vendor can change without touching the HTTP
/// layer. Implementations must not retry internally; failures surface to the
/// caller synchronously.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Start a streaming completion for the given model and history
    ///
    /// The returned stream yields assistant text fragments in arrival order
    /// and ends when the upstream completion finishes.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream request cannot be started; errors
    /// after the stream begins are yielded through the stream itself.
    async fn stream_chat(&self, model: ModelId, messages: &[Message]) -> Result<TextStream>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_user() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, "user");
        assert_eq!(msg.content, "Hello");
    }

    #[test]
    fn test_message_assistant() {
        let msg = Message::assistant("Hi there");
        assert_eq!(msg.role, "assistant");
        assert_eq!(msg.content, "Hi there");
    }

    #[test]
    fn test_message_system() {
        let msg = Message::system("You are helpful");
        assert_eq!(msg.role, "system");
        assert_eq!(msg.content, "You are helpful");
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::user("Test");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"content\":\"Test\""));
    }

    #[test]
    fn test_message_deserialization() {
        let msg: Message =
            serde_json::from_str(r#"{"role":"assistant","content":"ok"}"#).unwrap();
        assert_eq!(msg, Message::assistant("ok"));
    }
}
