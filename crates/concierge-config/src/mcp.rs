use std::collections::HashMap;

use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Top-level MCP configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct McpConfig {
    /// Tool-server configurations keyed by name
    #[serde(default)]
    pub servers: IndexMap<String, McpServerConfig>,
}

/// Configuration for a single MCP tool server
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct McpServerConfig {
    /// Server transport
    pub transport: McpTransport,
    /// Whether this server contributes tools (disabled servers are
    /// skipped silently)
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Prefix prepended to every tool name from this server
    ///
    /// Defaults to `<server_name>_`. Prefixes must be unique so tool
    /// names never collide across servers.
    #[serde(default)]
    pub prefix: Option<String>,
}

const fn default_enabled() -> bool {
    true
}

/// MCP server transport types
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum McpTransport {
    /// STDIO subprocess
    Stdio(StdioConfig),
    /// HTTP with streamable protocol
    StreamableHttp(HttpConfig),
}

/// STDIO transport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StdioConfig {
    /// Command to execute
    pub command: String,
    /// Command arguments
    #[serde(default)]
    pub args: Vec<String>,
    /// Environment variables
    #[serde(default)]
    pub env: HashMap<String, String>,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Server URL
    pub url: Url,
    /// Authentication configuration
    #[serde(default)]
    pub auth: Option<McpAuthConfig>,
}

/// MCP server authentication
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum McpAuthConfig {
    /// Static bearer token
    Token {
        /// The token value
        token: SecretString,
    },
}
