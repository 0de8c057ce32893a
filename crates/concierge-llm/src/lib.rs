//! LLM provider abstraction for the Concierge backend
//!
//! A `Provider` turns a conversation transcript into an [`LlmResponse`].
//! Providers are constructed once at startup and collected into a
//! read-only [`ProviderRegistry`] that resolves model ids by their
//! `/`-delimited prefix.
//!
//! Ordinary upstream failures (missing credential, 4xx/5xx, timeouts) do
//! not surface as errors: they come back as an `LlmResponse` whose
//! content is a human-readable diagnostic and whose `finish_reason` is
//! `"error"`, so callers never need provider-specific error handling.

#![allow(clippy::must_use_candidate)]

pub mod protocol;
pub mod provider;
mod registry;
mod types;

pub use provider::{ChatOptions, Provider, TextStream};
pub use registry::ProviderRegistry;
pub use types::{ChatMessage, FunctionCall, FunctionDefinition, LlmResponse, Role, ToolCall, ToolDefinition};

/// `finish_reason` used for responses that carry a diagnostic instead of
/// model output
pub const FINISH_REASON_ERROR: &str = "error";
