//! Aggregated tool catalog across all connected MCP servers

use std::time::Duration;

use rmcp::model::{CallToolResult, JsonObject, RawContent};

use concierge_config::McpConfig;
use concierge_llm::ToolDefinition;

use crate::client::McpClient;
use crate::error::McpError;

/// Fallback result text for a tool call that produced no content
const EMPTY_RESULT: &str = "OK";

/// Fallback text for an error result carrying no text content
const UNSPECIFIED_FAILURE: &str = "Tool call failed.";

/// Ceiling for one tool invocation, reconnect attempt included
const TOOL_CALL_TIMEOUT: Duration = Duration::from_secs(30);

struct ServerHandle {
    name: String,
    prefix: String,
    client: McpClient,
}

/// Connections to every enabled MCP server, with prefix-based tool
/// namespacing
///
/// Each server's tools are exposed under `<prefix><tool_name>`; the
/// prefix defaults to `<server_name>_`. Catalog listing is per call so a
/// server restart surfaces new tools without a gateway restart.
pub struct ToolServers {
    servers: Vec<ServerHandle>,
}

impl ToolServers {
    /// Connect to all enabled servers
    ///
    /// Servers that fail to connect are logged and skipped rather than
    /// failing startup; the catalog simply omits their tools.
    pub async fn connect(config: &McpConfig) -> Self {
        let mut servers = Vec::new();

        for (name, server_config) in &config.servers {
            if !server_config.enabled {
                continue;
            }

            match McpClient::connect(name, &server_config.transport).await {
                Ok(client) => {
                    let prefix = server_config.prefix.clone().unwrap_or_else(|| format!("{name}_"));
                    servers.push(ServerHandle {
                        name: name.clone(),
                        prefix,
                        client,
                    });
                }
                Err(e) => {
                    tracing::warn!(server = name, error = %e, "failed to connect to MCP server, skipping");
                }
            }
        }

        tracing::info!(count = servers.len(), "connected MCP servers");
        Self { servers }
    }

    /// Empty set with no connected servers
    pub fn disconnected() -> Self {
        Self { servers: Vec::new() }
    }

    /// Aggregate every connected server's tools into one flat catalog
    ///
    /// A server that fails to list is skipped for this turn; its tools
    /// reappear once it recovers.
    pub async fn catalog(&self) -> Vec<ToolDefinition> {
        let mut tools = Vec::new();

        for server in &self.servers {
            match server.client.list_tools().await {
                Ok(server_tools) => {
                    for tool in server_tools {
                        let raw_name = tool.name.to_string();
                        let description = tool
                            .description
                            .as_deref()
                            .filter(|d| !d.is_empty())
                            .map_or_else(|| describe(&server.name, &raw_name), ToOwned::to_owned);

                        tools.push(ToolDefinition::function(
                            format!("{}{raw_name}", server.prefix),
                            description,
                            normalize_schema(&tool.input_schema),
                        ));
                    }
                }
                Err(e) => {
                    tracing::warn!(server = %server.name, error = %e, "failed to list tools from MCP server");
                }
            }
        }

        tools
    }

    /// Invoke a tool by its qualified (prefixed) name and render the
    /// result as transcript text
    pub async fn invoke(
        &self,
        qualified_name: &str,
        arguments: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<String, McpError> {
        let prefixes: Vec<&str> = self.servers.iter().map(|s| s.prefix.as_str()).collect();
        let (index, raw_name) = resolve_prefix(&prefixes, qualified_name).ok_or_else(|| McpError::ToolNotFound {
            tool: qualified_name.to_owned(),
        })?;

        let server = &self.servers[index];
        tracing::debug!(server = %server.name, tool = raw_name, "invoking MCP tool");

        let result = tokio::time::timeout(TOOL_CALL_TIMEOUT, server.client.call_tool(raw_name, arguments))
            .await
            .map_err(|_| McpError::Transport(format!("tool '{raw_name}' timed out on {}", server.name)))??;
        Ok(render_result(&result))
    }

    /// Gracefully shut down all connections
    pub async fn shutdown(self) {
        for server in self.servers {
            if let Err(e) = server.client.shutdown().await {
                tracing::warn!(server = %server.name, error = %e, "MCP shutdown failed");
            }
        }
    }
}

/// Find the server whose prefix matches a qualified tool name
///
/// The longest matching prefix wins so overlapping prefixes resolve to
/// the most specific server. Returns the server index and the bare tool
/// name with the prefix stripped.
fn resolve_prefix<'a>(prefixes: &[&str], qualified: &'a str) -> Option<(usize, &'a str)> {
    prefixes
        .iter()
        .enumerate()
        .filter_map(|(i, prefix)| {
            qualified
                .strip_prefix(prefix)
                .filter(|raw| !raw.is_empty())
                .map(|raw| (i, raw, prefix.len()))
        })
        .max_by_key(|&(_, _, len)| len)
        .map(|(i, raw, _)| (i, raw))
}

/// Synthesized description for tools that ship without one
fn describe(server_name: &str, tool_name: &str) -> String {
    let mut label = server_name.to_owned();
    if let Some(first) = label.get_mut(..1) {
        first.make_ascii_uppercase();
    }
    format!("{label}: {tool_name}")
}

/// Input schema with `required` guaranteed present
///
/// Some function-calling backends reject an object schema that omits
/// `required`, so an empty list is filled in.
fn normalize_schema(schema: &JsonObject) -> serde_json::Value {
    let mut schema = schema.clone();
    schema
        .entry("required".to_owned())
        .or_insert_with(|| serde_json::Value::Array(Vec::new()));
    serde_json::Value::Object(schema)
}

/// Render a tool call result as a single transcript string
///
/// Error results yield their first text block (or a generic failure
/// line); success results join their text blocks, falling back to the
/// structured payload, then to a bare acknowledgement.
fn render_result(result: &CallToolResult) -> String {
    let texts: Vec<&str> = result
        .content
        .iter()
        .filter_map(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect();

    if result.is_error == Some(true) {
        return texts.first().map_or_else(|| UNSPECIFIED_FAILURE.to_owned(), |t| (*t).to_owned());
    }

    if !texts.is_empty() {
        return texts.join("\n");
    }

    if let Some(structured) = &result.structured_content {
        return serde_json::to_string(structured).unwrap_or_else(|_| EMPTY_RESULT.to_owned());
    }

    EMPTY_RESULT.to_owned()
}

#[cfg(test)]
mod tests {
    use rmcp::model::Content;
    use serde_json::json;

    use super::*;

    #[test]
    fn prefix_resolution_strips_the_prefix() {
        let prefixes = ["zapier_", "playwright_"];
        assert_eq!(resolve_prefix(&prefixes, "zapier_find_file"), Some((0, "find_file")));
        assert_eq!(
            resolve_prefix(&prefixes, "playwright_browser_click"),
            Some((1, "browser_click"))
        );
    }

    #[test]
    fn longest_prefix_wins() {
        let prefixes = ["crm_", "crm_admin_"];
        assert_eq!(resolve_prefix(&prefixes, "crm_admin_reset"), Some((1, "reset")));
        assert_eq!(resolve_prefix(&prefixes, "crm_lookup"), Some((0, "lookup")));
    }

    #[test]
    fn unknown_prefix_resolves_nothing() {
        let prefixes = ["zapier_"];
        assert_eq!(resolve_prefix(&prefixes, "github_create_issue"), None);
        // A bare prefix with no tool name left over is not a tool
        assert_eq!(resolve_prefix(&prefixes, "zapier_"), None);
    }

    #[test]
    fn missing_required_is_defaulted_to_empty_list() {
        let schema: JsonObject = json!({"type": "object", "properties": {"q": {"type": "string"}}})
            .as_object()
            .cloned()
            .unwrap();
        let normalized = normalize_schema(&schema);
        assert_eq!(normalized["required"], json!([]));
        assert_eq!(normalized["properties"]["q"]["type"], "string");
    }

    #[test]
    fn existing_required_is_preserved() {
        let schema: JsonObject = json!({"type": "object", "required": ["q"]}).as_object().cloned().unwrap();
        let normalized = normalize_schema(&schema);
        assert_eq!(normalized["required"], json!(["q"]));
    }

    #[test]
    fn description_fallback_names_the_server() {
        assert_eq!(describe("zapier", "find_file"), "Zapier: find_file");
    }

    #[test]
    fn success_texts_are_joined() {
        let result = CallToolResult::success(vec![Content::text("line one"), Content::text("line two")]);
        assert_eq!(render_result(&result), "line one\nline two");
    }

    #[test]
    fn error_result_uses_first_text() {
        let result = CallToolResult::error(vec![Content::text("boom"), Content::text("ignored")]);
        assert_eq!(render_result(&result), "boom");
    }

    #[test]
    fn error_without_text_is_generic() {
        let result = CallToolResult::error(vec![]);
        assert_eq!(render_result(&result), UNSPECIFIED_FAILURE);
    }

    #[test]
    fn structured_only_result_is_serialized() {
        let mut result = CallToolResult::success(vec![]);
        result.structured_content = Some(json!({"count": 3}));
        assert_eq!(render_result(&result), "{\"count\":3}");
    }

    #[test]
    fn empty_result_acknowledges() {
        let result = CallToolResult::success(vec![]);
        assert_eq!(render_result(&result), EMPTY_RESULT);
    }
}
