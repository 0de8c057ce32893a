//! OpenRouter provider implementation
//!
//! Speaks the OpenAI-compatible chat completions protocol. One provider
//! instance serves every model id OpenRouter exposes.

use std::time::Duration;

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use concierge_config::LlmProviderConfig;

use super::{ChatOptions, Provider, TextStream};
use crate::protocol::{WireMessage, WireRequest, WireResponse, WireStreamChunk};
use crate::types::{ChatMessage, LlmResponse, Role, ToolCall};

/// Default OpenRouter API base URL
const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Ceiling for one chat completion round trip
const CHAT_TIMEOUT: Duration = Duration::from_secs(60);

/// Diagnostic returned when no API key is configured
const MISSING_KEY: &str = "OpenRouter API key is not configured. Set api_key for the openrouter provider.";

/// OpenRouter provider
pub struct OpenRouterProvider {
    id: String,
    display_name: String,
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
}

impl OpenRouterProvider {
    /// Create from provider configuration
    pub fn new(id: String, config: &LlmProviderConfig) -> Self {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| Url::parse(DEFAULT_BASE_URL).expect("valid default URL"));

        let client = Client::builder()
            .timeout(CHAT_TIMEOUT)
            .build()
            .unwrap_or_default();

        let display_name = config.display_name.clone().unwrap_or_else(|| "OpenRouter".to_owned());

        Self {
            id,
            display_name,
            client,
            base_url,
            api_key: config.api_key.clone(),
        }
    }

    /// Build the chat completions URL
    fn completions_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/chat/completions")
    }

    /// Model id sent on the wire; bare ids get the provider prefix
    fn wire_model(&self, model_id: &str) -> String {
        if model_id.contains('/') {
            model_id.to_owned()
        } else {
            format!("{}/{model_id}", self.id)
        }
    }

    /// Assemble the request body from transcript and options
    fn build_request(&self, messages: &[ChatMessage], model_id: &str, options: &ChatOptions) -> WireRequest {
        let mut wire_messages: Vec<WireMessage> = Vec::with_capacity(messages.len() + 1);
        if let Some(ref system) = options.system_prompt {
            wire_messages.push(WireMessage {
                role: Role::System.as_str().to_owned(),
                content: Some(system.clone()),
                tool_calls: None,
                tool_call_id: None,
            });
        }
        wire_messages.extend(messages.iter().map(WireMessage::from));

        let has_tools = options.tools.as_ref().is_some_and(|t| !t.is_empty());
        WireRequest {
            model: self.wire_model(model_id),
            messages: wire_messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            tools: if has_tools { options.tools.clone() } else { None },
            tool_choice: has_tools.then(|| "auto".to_owned()),
            stream: None,
        }
    }
}

/// Map an upstream HTTP status to a short user-facing diagnostic
fn status_diagnostic(status: reqwest::StatusCode) -> String {
    if status.as_u16() == 401 {
        return "The OpenRouter API key was rejected. Check the configured api_key.".to_owned();
    }
    if status.as_u16() == 429 {
        return "OpenRouter rate limit exceeded. Wait a moment and try again.".to_owned();
    }
    if status.is_server_error() {
        return "The LLM service is temporarily unavailable. Try again in a minute or pick another model.".to_owned();
    }
    format!("The LLM request was rejected upstream ({status}).")
}

#[async_trait]
impl Provider for OpenRouterProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn chat(&self, messages: &[ChatMessage], model_id: &str, options: &ChatOptions) -> LlmResponse {
        let Some(ref api_key) = self.api_key else {
            return LlmResponse::error(MISSING_KEY, model_id);
        };

        let body = self.build_request(messages, model_id, options);

        let response = match self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(provider = %self.id, error = %e, "upstream request failed");
                return LlmResponse::error(
                    "Could not reach the LLM service. Check connectivity and try again.",
                    body.model,
                );
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            let truncated: String = detail.chars().take(500).collect();
            tracing::warn!(provider = %self.id, status = %status, detail = %truncated, "upstream returned error");
            return LlmResponse::error(status_diagnostic(status), body.model);
        }

        let wire: WireResponse = match response.json().await {
            Ok(wire) => wire,
            Err(e) => {
                tracing::warn!(provider = %self.id, error = %e, "failed to parse upstream response");
                return LlmResponse::error("The LLM service returned an unreadable response.", body.model);
            }
        };

        let model_used = wire.model.unwrap_or(body.model);
        let Some(choice) = wire.choices.into_iter().next() else {
            return LlmResponse {
                content: String::new(),
                model_used,
                finish_reason: Some("unknown".to_owned()),
                tool_calls: None,
            };
        };

        LlmResponse {
            content: choice.message.content.unwrap_or_default(),
            model_used,
            finish_reason: choice.finish_reason,
            tool_calls: choice
                .message
                .tool_calls
                .map(|calls| calls.into_iter().map(ToolCall::from).collect()),
        }
    }

    async fn stream(&self, messages: &[ChatMessage], model_id: &str, options: &ChatOptions) -> TextStream {
        let Some(ref api_key) = self.api_key else {
            return Box::pin(futures_util::stream::iter([MISSING_KEY.to_owned()]));
        };

        let mut body = self.build_request(messages, model_id, options);
        body.stream = Some(true);

        let response = match self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                let diagnostic = status_diagnostic(response.status());
                return Box::pin(futures_util::stream::iter([diagnostic]));
            }
            Err(e) => {
                tracing::warn!(provider = %self.id, error = %e, "upstream stream request failed");
                return Box::pin(futures_util::stream::iter([
                    "Could not reach the LLM service. Check connectivity and try again.".to_owned(),
                ]));
            }
        };

        let fragments = response
            .bytes_stream()
            .eventsource()
            .filter_map(|event| async move {
                let event = event.ok()?;
                let data = event.data.trim().to_owned();
                if data == "[DONE]" {
                    return None;
                }
                let chunk: WireStreamChunk = serde_json::from_str(&data).ok()?;
                chunk.choices.into_iter().next().and_then(|c| c.delta.content)
            });

        Box::pin(fragments)
    }
}
