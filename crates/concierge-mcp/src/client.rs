use std::borrow::Cow;

use rmcp::model::{CallToolRequestParam, CallToolResult, Tool};
use rmcp::service::{RoleClient, RunningService, ServiceExt as _};
use rmcp::transport::{StreamableHttpClientTransport, TokioChildProcess};
use secrecy::ExposeSecret;
use tokio::sync::Mutex;

use concierge_config::{HttpConfig, McpAuthConfig, McpTransport, StdioConfig};

use crate::error::McpError;

/// Connected MCP client wrapping a running rmcp service
///
/// The transport config is retained so a failed call can reconnect and
/// retry once before surfacing the error.
pub struct McpClient {
    service: Mutex<RunningService<RoleClient, ()>>,
    server_name: String,
    transport: McpTransport,
}

impl McpClient {
    /// Connect to an MCP server over its configured transport
    pub async fn connect(name: &str, transport: &McpTransport) -> Result<Self, McpError> {
        let service = Self::open(transport).await?;

        tracing::info!(server = name, "connected to MCP server");

        Ok(Self {
            service: Mutex::new(service),
            server_name: name.to_owned(),
            transport: transport.clone(),
        })
    }

    async fn open(transport: &McpTransport) -> Result<RunningService<RoleClient, ()>, McpError> {
        match transport {
            McpTransport::Stdio(config) => Self::open_stdio(config).await,
            McpTransport::StreamableHttp(config) => Self::open_streamable_http(config).await,
        }
    }

    async fn open_stdio(config: &StdioConfig) -> Result<RunningService<RoleClient, ()>, McpError> {
        let mut cmd = tokio::process::Command::new(&config.command);
        cmd.args(&config.args);
        for (k, v) in &config.env {
            cmd.env(k, v);
        }

        let transport =
            TokioChildProcess::new(cmd).map_err(|e| McpError::Transport(format!("failed to spawn process: {e}")))?;

        ().serve(transport)
            .await
            .map_err(|e| McpError::Transport(format!("STDIO handshake failed: {e}")))
    }

    async fn open_streamable_http(config: &HttpConfig) -> Result<RunningService<RoleClient, ()>, McpError> {
        use rmcp::transport::streamable_http_client::StreamableHttpClientTransportConfig;

        let mut transport_config = StreamableHttpClientTransportConfig::with_uri(config.url.as_str());

        if let Some(McpAuthConfig::Token { ref token }) = config.auth {
            transport_config = transport_config.auth_header(format!("Bearer {}", token.expose_secret()));
        }

        let client = reqwest::Client::new();
        let transport = StreamableHttpClientTransport::with_client(client, transport_config);

        ().serve(transport)
            .await
            .map_err(|e| McpError::Transport(format!("StreamableHTTP handshake failed: {e}")))
    }

    /// List all tools available on this server
    pub async fn list_tools(&self) -> Result<Vec<Tool>, McpError> {
        self.service
            .lock()
            .await
            .list_all_tools()
            .await
            .map_err(|e| McpError::Transport(format!("list_tools failed on {}: {e}", self.server_name)))
    }

    /// Call a tool on this server, reconnecting once on failure
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<CallToolResult, McpError> {
        let first_result = {
            let guard = self.service.lock().await;
            guard
                .call_tool(CallToolRequestParam {
                    name: Cow::Owned(name.to_owned()),
                    arguments: arguments.clone(),
                })
                .await
        };

        if let Ok(result) = first_result {
            return Ok(result);
        }

        tracing::warn!(server = %self.server_name, "MCP transport failure, reconnecting");

        let new_service = Self::open(&self.transport).await?;

        let mut guard = self.service.lock().await;
        *guard = new_service;

        guard
            .call_tool(CallToolRequestParam {
                name: Cow::Owned(name.to_owned()),
                arguments,
            })
            .await
            .map_err(|e| {
                McpError::Execution(format!(
                    "tool '{}' failed on {} after reconnect: {e}",
                    name, self.server_name
                ))
            })
    }

    /// Gracefully shut down the connection
    pub async fn shutdown(self) -> Result<(), McpError> {
        self.service
            .into_inner()
            .cancel()
            .await
            .map_err(|e| McpError::Transport(format!("shutdown failed: {e}")))?;
        Ok(())
    }
}
