//! OpenAI-compatible completion gateway
//!
//! Connects to a hosted gateway speaking the OpenAI chat-completions wire
//! format and relays the server-sent-event stream as plain text fragments.
//! The system prompt and token cap are applied here so every conversation
//! reaches the upstream model the same way.

use crate::config::GatewayConfig;
use crate::error::{ChatRelayError, Result};
use crate::gateway::{CompletionGateway, Message, TextStream};
use crate::models::ModelId;
use crate::prompts::build_system_prompt;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Gateway client for OpenAI-compatible chat completion endpoints
///
/// # Examples
///
/// ```no_run
/// use chatrelay::config::GatewayConfig;
/// use chatrelay::gateway::{CompletionGateway, Message, OpenAiGateway};
/// use chatrelay::models::ModelId;
/// use futures::StreamExt;
///
/// # async fn example() -> chatrelay::error::Result<()> {
/// let gateway = OpenAiGateway::new(GatewayConfig::default())?;
/// let messages = vec![Message::user("Hello!")];
/// let mut stream = gateway.stream_chat(ModelId::Gpt4o, &messages).await?;
/// while let Some(fragment) = stream.next().await {
///     print!("{}", fragment?);
/// }
/// # Ok(())
/// # }
/// ```
pub struct OpenAiGateway {
    client: Client,
    config: GatewayConfig,
}

/// Request body for /chat/completions
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: usize,
    stream: bool,
}

/// One SSE chunk of a streamed completion
#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

/// Choice entry within a streamed chunk
#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

/// Incremental message delta within a choice
#[derive(Debug, Deserialize, Default)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiGateway {
    /// Create a new gateway client
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("chatrelay/0.2.0")
            .build()
            .map_err(|e| ChatRelayError::Gateway(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Endpoint URL for chat completions
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionGateway for OpenAiGateway {
    async fn stream_chat(&self, model: ModelId, messages: &[Message]) -> Result<TextStream> {
        let mut wire_messages = Vec::with_capacity(messages.len() + 1);
        wire_messages.push(Message::system(build_system_prompt()));
        wire_messages.extend_from_slice(messages);

        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages: wire_messages,
            max_tokens: self.config.max_tokens,
            stream: true,
        };

        tracing::debug!("Starting streamed completion with model {}", model);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatRelayError::Gateway(format!("Request to gateway failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChatRelayError::Gateway(format!(
                "Gateway returned {}: {}",
                status, body
            ))
            .into());
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let byte_stream = response.bytes_stream();

        tokio::spawn(async move {
            relay_sse_stream(byte_stream, tx).await;
        });

        Ok(Box::pin(UnboundedReceiverStream::new(rx)))
    }
}

/// Parse an OpenAI-style SSE byte stream and forward text deltas
///
/// Runs inside a `tokio::spawn` and consumes the stream until the `[DONE]`
/// sentinel, the stream ends, or the receiver is dropped.
///
/// SSE field processing:
///
/// - `data: [DONE]` -- end of completion, stop reading.
/// - other `data:` values -- parsed as a completion chunk; the delta
///   content, when present, is forwarded.
/// - all other fields and comment lines -- ignored.
async fn relay_sse_stream(
    byte_stream: impl Stream<Item = reqwest::Result<Bytes>>,
    tx: mpsc::UnboundedSender<Result<String>>,
) {
    // Buffer accumulates raw bytes between `\n\n` boundaries.
    let mut buffer = String::new();

    tokio::pin!(byte_stream);

    while let Some(chunk_result) = byte_stream.next().await {
        let chunk = match chunk_result {
            Ok(c) => c,
            Err(e) => {
                let _ = tx.send(Err(ChatRelayError::Gateway(format!(
                    "Gateway stream interrupted: {}",
                    e
                ))
                .into()));
                return;
            }
        };

        match std::str::from_utf8(&chunk) {
            Ok(text) => buffer.push_str(text),
            Err(_) => continue,
        }

        // SSE events are separated by blank lines (`\n\n`).
        while let Some(pos) = buffer.find("\n\n") {
            let event_block = buffer[..pos].to_string();
            buffer = buffer[pos + 2..].to_string();
            if !process_sse_event(&event_block, &tx) {
                return;
            }
        }
    }

    // Process any remaining partial event in the buffer.
    if !buffer.is_empty() {
        process_sse_event(&buffer, &tx);
    }
}

/// Process a single SSE event block (the text between two `\n\n` delimiters)
///
/// Returns `false` when the stream is complete (the `[DONE]` sentinel was
/// seen or the receiver went away) and reading should stop.
fn process_sse_event(event_block: &str, tx: &mpsc::UnboundedSender<Result<String>>) -> bool {
    for line in event_block.lines() {
        let Some(data) = line.strip_prefix("data:") else {
            // `event:`/`id:`/`retry:` fields and `:` comments are ignored.
            continue;
        };
        let data = data.trim();

        if data == "[DONE]" {
            return false;
        }

        let chunk: ChatCompletionChunk = match serde_json::from_str(data) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Skipping unparseable gateway chunk: {}", e);
                continue;
            }
        };

        let content = chunk
            .choices
            .first()
            .and_then(|choice| choice.delta.content.as_deref());

        if let Some(content) = content {
            if !content.is_empty() && tx.send(Ok(content.to_string())).is_err() {
                return false;
            }
        }
    }

    true
}
