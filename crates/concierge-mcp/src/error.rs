use http::StatusCode;
use thiserror::Error;

use concierge_core::HttpError;

/// MCP subsystem errors
#[derive(Debug, Error)]
pub enum McpError {
    /// No connected server owns the requested tool
    #[error("tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// Transport-level connection or communication error
    #[error("transport error: {0}")]
    Transport(String),

    /// Tool execution failed on the downstream server
    #[error("tool execution failed: {0}")]
    Execution(String),
}

impl HttpError for McpError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ToolNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Transport(_) => StatusCode::BAD_GATEWAY,
            Self::Execution(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::ToolNotFound { .. } => "not_found",
            Self::Transport(_) => "transport_error",
            Self::Execution(_) => "execution_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::ToolNotFound { tool } => format!("tool not found: {tool}"),
            Self::Transport(_) => "failed to communicate with MCP server".to_owned(),
            Self::Execution(msg) => format!("tool execution failed: {msg}"),
        }
    }
}
