#![allow(clippy::must_use_candidate)]

//! TOML configuration for the Concierge backend
//!
//! Config files may reference environment variables with
//! `{{ env.VAR }}` placeholders, expanded before deserialization.

mod env;
pub mod llm;
mod loader;
pub mod mcp;
pub mod server;
pub mod support;
pub mod telemetry;

use serde::Deserialize;

pub use llm::*;
pub use mcp::*;
pub use server::*;
pub use support::*;
pub use telemetry::TelemetryConfig;

/// Top-level Concierge configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// LLM provider configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// MCP tool-server configuration
    #[serde(default)]
    pub mcp: McpConfig,
    /// Support classification and routing configuration
    #[serde(default)]
    pub support: SupportConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
