//! Provider trait and implementations for LLM backends

pub mod openrouter;

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;

use crate::types::{ChatMessage, LlmResponse, ToolDefinition};

/// Lazy sequence of text fragments from a streaming completion
pub type TextStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// Per-request generation options
#[derive(Debug, Clone)]
pub struct ChatOptions {
    /// System prompt prepended to the transcript
    pub system_prompt: Option<String>,
    /// Sampling temperature
    pub temperature: f64,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Tool catalog; `None` omits the tools field from the request
    pub tools: Option<Vec<ToolDefinition>>,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            system_prompt: None,
            temperature: 0.7,
            max_tokens: 4096,
            tools: None,
        }
    }
}

/// Trait implemented by each LLM provider backend
///
/// `chat` must not return an error for ordinary failure modes (missing
/// credential, rate limit, upstream 4xx/5xx, timeout): those degrade to
/// an [`LlmResponse`] carrying a diagnostic string with
/// `finish_reason = "error"`.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider id, the `/`-delimited model prefix this provider serves
    fn id(&self) -> &str;

    /// Human-readable provider name
    fn display_name(&self) -> &str;

    /// Whether the provider is minimally configured (credential present)
    ///
    /// Used for capability listing only; never gates `chat`.
    fn is_available(&self) -> bool;

    /// Send a chat completion request
    async fn chat(&self, messages: &[ChatMessage], model_id: &str, options: &ChatOptions) -> LlmResponse;

    /// Stream a chat completion as text fragments
    ///
    /// The default implementation produces a single fragment equal to the
    /// full `chat` content.
    async fn stream(&self, messages: &[ChatMessage], model_id: &str, options: &ChatOptions) -> TextStream {
        let response = self.chat(messages, model_id, options).await;
        Box::pin(futures_util::stream::iter([response.content]))
    }
}
