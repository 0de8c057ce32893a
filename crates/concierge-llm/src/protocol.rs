//! OpenAI-compatible chat completion wire format
//!
//! OpenRouter speaks this protocol; any other OpenAI-compatible backend
//! can reuse these types.

use serde::{Deserialize, Serialize};

use crate::types::{ChatMessage, FunctionCall, Role, ToolCall, ToolDefinition};

/// Chat completion request body
#[derive(Debug, Clone, Serialize)]
pub struct WireRequest {
    /// Model identifier
    pub model: String,
    /// Conversation messages
    pub messages: Vec<WireMessage>,
    /// Sampling temperature
    pub temperature: f64,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Tool definitions; omitted entirely when no tools are available
    /// (an empty list is not equivalent for every backend)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    /// Tool selection mode, "auto" whenever tools are present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

/// Message within a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    /// Message role
    pub role: String,
    /// Content; `null` is allowed on assistant messages that only carry
    /// tool calls
    pub content: Option<String>,
    /// Tool calls made by the assistant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<WireToolCall>>,
    /// Tool call id this message responds to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl From<&ChatMessage> for WireMessage {
    fn from(m: &ChatMessage) -> Self {
        match m.role {
            Role::Tool => Self {
                role: m.role.as_str().to_owned(),
                content: Some(m.content.clone().unwrap_or_default()),
                tool_calls: None,
                tool_call_id: m.tool_call_id.clone(),
            },
            _ if m.tool_calls.is_some() => Self {
                role: m.role.as_str().to_owned(),
                // Explicit null when the assistant message is tool-calls only
                content: m.content.clone().filter(|c| !c.is_empty()),
                tool_calls: m
                    .tool_calls
                    .as_ref()
                    .map(|calls| calls.iter().map(WireToolCall::from).collect()),
                tool_call_id: None,
            },
            _ => Self {
                role: m.role.as_str().to_owned(),
                content: Some(m.content.clone().unwrap_or_default()),
                tool_calls: None,
                tool_call_id: None,
            },
        }
    }
}

/// Tool call within a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireToolCall {
    /// Unique tool call identifier
    pub id: String,
    /// Tool type, always "function"
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function call details
    pub function: WireFunctionCall,
}

/// Function call details within a tool call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireFunctionCall {
    /// Function name
    pub name: String,
    /// JSON-encoded arguments
    pub arguments: String,
}

impl From<&ToolCall> for WireToolCall {
    fn from(call: &ToolCall) -> Self {
        Self {
            id: call.id.clone(),
            tool_type: "function".to_owned(),
            function: WireFunctionCall {
                name: call.function.name.clone(),
                arguments: call.function.arguments.clone(),
            },
        }
    }
}

impl From<WireToolCall> for ToolCall {
    fn from(call: WireToolCall) -> Self {
        Self {
            id: call.id,
            function: FunctionCall {
                name: call.function.name,
                arguments: call.function.arguments,
            },
        }
    }
}

/// Chat completion response body
#[derive(Debug, Clone, Deserialize)]
pub struct WireResponse {
    /// Model that served the request
    #[serde(default)]
    pub model: Option<String>,
    /// Generated choices
    #[serde(default)]
    pub choices: Vec<WireChoice>,
}

/// Choice within a response
#[derive(Debug, Clone, Deserialize)]
pub struct WireChoice {
    /// Generated message
    pub message: WireChoiceMessage,
    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message within a response choice
#[derive(Debug, Clone, Deserialize)]
pub struct WireChoiceMessage {
    /// Text content
    #[serde(default)]
    pub content: Option<String>,
    /// Tool calls requested by the model
    #[serde(default)]
    pub tool_calls: Option<Vec<WireToolCall>>,
}

/// Streaming chunk (`data:` payload of one SSE event)
#[derive(Debug, Clone, Deserialize)]
pub struct WireStreamChunk {
    /// Delta choices
    #[serde(default)]
    pub choices: Vec<WireStreamChoice>,
}

/// Choice within a streaming chunk
#[derive(Debug, Clone, Deserialize)]
pub struct WireStreamChoice {
    /// Incremental delta
    #[serde(default)]
    pub delta: WireStreamDelta,
}

/// Delta content within a streaming choice
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireStreamDelta {
    /// Incremental text content
    #[serde(default)]
    pub content: Option<String>,
}
