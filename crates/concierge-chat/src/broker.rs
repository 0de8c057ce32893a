use async_trait::async_trait;

use concierge_llm::ToolDefinition;
use concierge_mcp::{McpError, ToolServers};

/// Tool surface the orchestrator talks to
///
/// Abstracts over [`ToolServers`] so orchestration tests can script tool
/// behavior without spawning MCP processes.
#[async_trait]
pub trait ToolBroker: Send + Sync {
    /// Current flat tool catalog in function-calling format
    async fn catalog(&self) -> Vec<ToolDefinition>;

    /// Invoke a tool by qualified name, returning transcript text
    async fn invoke(
        &self,
        qualified_name: &str,
        arguments: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<String, McpError>;
}

#[async_trait]
impl ToolBroker for ToolServers {
    async fn catalog(&self) -> Vec<ToolDefinition> {
        Self::catalog(self).await
    }

    async fn invoke(
        &self,
        qualified_name: &str,
        arguments: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<String, McpError> {
        Self::invoke(self, qualified_name, arguments).await
    }
}
