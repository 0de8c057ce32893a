//! Tool catalog aggregation and invocation over MCP
//!
//! Connects to configured MCP servers at startup, exposes their tools as
//! one flat, prefix-namespaced catalog in function-calling format, and
//! routes invocations back to the owning server.

mod client;
mod error;
mod servers;

pub use client::McpClient;
pub use error::McpError;
pub use servers::ToolServers;
