//! Reply generation with bounded tool-calling rounds

use std::sync::Arc;

use concierge_core::StoredMessage;
use concierge_llm::{ChatMessage, ChatOptions, ProviderRegistry, Role};
use concierge_storage::Storage;

use crate::broker::ToolBroker;
use crate::error::ChatError;

/// Maximum tool-calling rounds per user message
///
/// One round is an assistant tool-call request plus the execution of
/// every call in it. The bound keeps a looping model from spinning
/// forever.
pub const MAX_TOOL_ROUNDS: usize = 5;

/// Reply when no provider is configured at all
const NO_PROVIDER_REPLY: &str = "No LLM provider is configured. Add a provider with an API key to enable replies.";

/// Reply when the round budget ran out with the model still asking for
/// tools and no text to show for it
const ROUND_LIMIT_REPLY: &str = "(tool-call limit reached.)";

/// Orchestrates one reply: transcript assembly, provider selection,
/// tool-calling rounds, and persistence of both turns
pub struct ChatEngine {
    storage: Arc<dyn Storage>,
    registry: Arc<ProviderRegistry>,
    tools: Arc<dyn ToolBroker>,
    default_model: String,
}

impl ChatEngine {
    /// Build an engine over shared storage, providers, and tools
    pub fn new(
        storage: Arc<dyn Storage>,
        registry: Arc<ProviderRegistry>,
        tools: Arc<dyn ToolBroker>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            registry,
            tools,
            default_model: default_model.into(),
        }
    }

    /// Generate and persist the assistant reply to one user message
    ///
    /// Provider and tool failures degrade into reply text; the only hard
    /// failure is a chat id that does not exist. Model precedence is the
    /// explicit override, then the chat's pinned model, then the
    /// configured default.
    pub async fn generate_reply(
        &self,
        chat_id: &str,
        user_text: &str,
        model_override: Option<&str>,
    ) -> Result<String, ChatError> {
        let chat = self.storage.get_chat(chat_id).await.ok_or_else(|| ChatError::ChatNotFound {
            chat_id: chat_id.to_owned(),
        })?;

        self.storage
            .append_message(
                chat_id,
                StoredMessage {
                    role: Role::User.as_str().to_owned(),
                    content: user_text.to_owned(),
                },
            )
            .await?;

        let model_id = model_override
            .map(ToOwned::to_owned)
            .or_else(|| chat.model_id.clone())
            .unwrap_or_else(|| self.default_model.clone());

        let Some((provider_id, provider)) = self.registry.resolve(&model_id) else {
            tracing::warn!(chat = chat_id, model = %model_id, "no provider available for model");
            return self.persist_reply(chat_id, NO_PROVIDER_REPLY.to_owned()).await;
        };

        let system_prompt = match chat.agent_id {
            Some(ref agent_id) => self
                .storage
                .get_agent(agent_id)
                .await
                .and_then(|agent| agent.system_prompt),
            None => None,
        };

        let catalog = self.tools.catalog().await;
        let options = ChatOptions {
            system_prompt,
            tools: (!catalog.is_empty()).then_some(catalog),
            ..ChatOptions::default()
        };

        // The history already ends with the user message appended above
        let mut messages: Vec<ChatMessage> = self
            .storage
            .history(chat_id)
            .await
            .into_iter()
            .filter_map(|m| Role::parse(&m.role).map(|role| ChatMessage::text(role, m.content)))
            .collect();

        let mut response = provider.chat(&messages, &model_id, &options).await;
        let mut rounds = 0;

        while response.has_tool_calls() && rounds < MAX_TOOL_ROUNDS {
            rounds += 1;
            let calls = response.tool_calls.clone().unwrap_or_default();
            let content = (!response.content.is_empty()).then(|| response.content.clone());
            messages.push(ChatMessage::assistant_with_tools(content, calls.clone()));

            // Tools run sequentially, in the order the model asked for them
            for call in &calls {
                let arguments = parse_arguments(&call.function.arguments);
                let result = match self.tools.invoke(&call.function.name, Some(arguments)).await {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(chat = chat_id, tool = %call.function.name, error = %e, "tool invocation failed");
                        format!("Error: {e}")
                    }
                };
                messages.push(ChatMessage::tool_result(call.id.clone(), result));
            }

            response = provider.chat(&messages, &model_id, &options).await;
        }

        tracing::debug!(
            chat = chat_id,
            provider = %provider_id,
            model = %response.model_used,
            rounds,
            "reply generated"
        );

        // A response without tool calls is terminal and its content is
        // the reply, even when empty. The fallback only covers round
        // exhaustion with nothing to show.
        let reply = if response.has_tool_calls() && response.content.is_empty() {
            ROUND_LIMIT_REPLY.to_owned()
        } else {
            response.content
        };

        self.persist_reply(chat_id, reply).await
    }

    async fn persist_reply(&self, chat_id: &str, reply: String) -> Result<String, ChatError> {
        self.storage
            .append_message(
                chat_id,
                StoredMessage {
                    role: Role::Assistant.as_str().to_owned(),
                    content: reply.clone(),
                },
            )
            .await?;
        Ok(reply)
    }
}

/// Parse model-produced tool arguments, tolerating malformed JSON
///
/// The model occasionally emits truncated or invalid JSON; those calls
/// proceed with empty arguments rather than aborting the round.
fn parse_arguments(raw: &str) -> serde_json::Map<String, serde_json::Value> {
    serde_json::from_str::<serde_json::Value>(raw)
        .ok()
        .and_then(|v| v.as_object().cloned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use concierge_core::Agent;
    use concierge_llm::{FunctionCall, LlmResponse, Provider, ToolCall, ToolDefinition};
    use concierge_mcp::McpError;
    use concierge_storage::MemoryStorage;

    use super::*;

    struct ScriptedProvider {
        responses: Mutex<VecDeque<LlmResponse>>,
        calls: Mutex<Vec<(Vec<ChatMessage>, ChatOptions)>>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<LlmResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn call(&self, index: usize) -> (Vec<ChatMessage>, ChatOptions) {
            self.calls.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        fn id(&self) -> &str {
            "scripted"
        }

        fn display_name(&self) -> &str {
            "Scripted"
        }

        fn is_available(&self) -> bool {
            true
        }

        async fn chat(&self, messages: &[ChatMessage], model_id: &str, options: &ChatOptions) -> LlmResponse {
            self.calls.lock().unwrap().push((messages.to_vec(), options.clone()));
            self.responses.lock().unwrap().pop_front().unwrap_or_else(|| LlmResponse {
                content: "exhausted script".to_owned(),
                model_used: model_id.to_owned(),
                finish_reason: Some("stop".to_owned()),
                tool_calls: None,
            })
        }
    }

    struct StubBroker {
        tools: Vec<ToolDefinition>,
        invocations: Mutex<Vec<(String, serde_json::Map<String, serde_json::Value>)>>,
        fail: bool,
    }

    impl StubBroker {
        fn with_tools() -> Self {
            Self {
                tools: vec![ToolDefinition::function(
                    "zapier_find_file",
                    "Zapier: find_file",
                    serde_json::json!({"type": "object", "properties": {}, "required": []}),
                )],
                invocations: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn empty() -> Self {
            Self {
                tools: Vec::new(),
                invocations: Mutex::new(Vec::new()),
                fail: false,
            }
        }
    }

    #[async_trait]
    impl ToolBroker for StubBroker {
        async fn catalog(&self) -> Vec<ToolDefinition> {
            self.tools.clone()
        }

        async fn invoke(
            &self,
            qualified_name: &str,
            arguments: Option<serde_json::Map<String, serde_json::Value>>,
        ) -> Result<String, McpError> {
            self.invocations
                .lock()
                .unwrap()
                .push((qualified_name.to_owned(), arguments.unwrap_or_default()));
            if self.fail {
                Err(McpError::ToolNotFound {
                    tool: qualified_name.to_owned(),
                })
            } else {
                Ok("3 files found".to_owned())
            }
        }
    }

    fn text_response(content: &str) -> LlmResponse {
        LlmResponse {
            content: content.to_owned(),
            model_used: "openrouter/auto".to_owned(),
            finish_reason: Some("stop".to_owned()),
            tool_calls: None,
        }
    }

    fn tool_call_response(name: &str, arguments: &str) -> LlmResponse {
        LlmResponse {
            content: String::new(),
            model_used: "openrouter/auto".to_owned(),
            finish_reason: Some("tool_calls".to_owned()),
            tool_calls: Some(vec![ToolCall {
                id: "call_1".to_owned(),
                function: FunctionCall {
                    name: name.to_owned(),
                    arguments: arguments.to_owned(),
                },
            }]),
        }
    }

    struct Harness {
        storage: Arc<MemoryStorage>,
        provider: Arc<ScriptedProvider>,
        broker: Arc<StubBroker>,
        engine: ChatEngine,
    }

    fn harness(responses: Vec<LlmResponse>, broker: StubBroker) -> Harness {
        let storage = Arc::new(MemoryStorage::new());
        let provider = Arc::new(ScriptedProvider::new(responses));
        let broker = Arc::new(broker);

        let mut registry = ProviderRegistry::new();
        registry.register(provider.clone());
        registry.set_default("scripted");

        let engine = ChatEngine::new(
            storage.clone(),
            Arc::new(registry),
            broker.clone(),
            "openrouter/auto",
        );

        Harness {
            storage,
            provider,
            broker,
            engine,
        }
    }

    #[tokio::test]
    async fn plain_reply_is_persisted_with_both_turns() {
        let h = harness(vec![text_response("Hello!")], StubBroker::empty());
        let chat = h.storage.create_chat(None).await;

        let reply = h.engine.generate_reply(&chat.id, "hi", None).await.unwrap();
        assert_eq!(reply, "Hello!");

        let history = h.storage.history(&chat.id).await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, "user");
        assert_eq!(history[1].content, "Hello!");
    }

    #[tokio::test]
    async fn unknown_chat_is_a_hard_failure() {
        let h = harness(vec![], StubBroker::empty());
        let result = h.engine.generate_reply("nope", "hi", None).await;
        assert!(matches!(result, Err(ChatError::ChatNotFound { .. })));
    }

    #[tokio::test]
    async fn tool_round_inserts_assistant_and_tool_messages() {
        let h = harness(
            vec![
                tool_call_response("zapier_find_file", r#"{"q":"invoice"}"#),
                text_response("Found 3 files."),
            ],
            StubBroker::with_tools(),
        );
        let chat = h.storage.create_chat(None).await;

        let reply = h.engine.generate_reply(&chat.id, "find my invoices", None).await.unwrap();
        assert_eq!(reply, "Found 3 files.");
        assert_eq!(h.provider.call_count(), 2);

        // Second provider call sees: user, assistant(tool_calls), tool
        let (messages, _) = h.provider.call(1);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, Role::Assistant);
        assert!(messages[1].tool_calls.is_some());
        assert_eq!(messages[2].role, Role::Tool);
        assert_eq!(messages[2].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(messages[2].content.as_deref(), Some("3 files found"));

        let invocations = h.broker.invocations.lock().unwrap();
        assert_eq!(invocations[0].0, "zapier_find_file");
        assert_eq!(invocations[0].1["q"], "invoice");
    }

    #[tokio::test]
    async fn rounds_are_bounded_and_exhaustion_falls_back() {
        let responses = (0..10)
            .map(|_| tool_call_response("zapier_find_file", "{}"))
            .collect();
        let h = harness(responses, StubBroker::with_tools());
        let chat = h.storage.create_chat(None).await;

        let reply = h.engine.generate_reply(&chat.id, "loop forever", None).await.unwrap();
        assert_eq!(reply, "(tool-call limit reached.)");
        // Initial call plus one per round
        assert_eq!(h.provider.call_count(), 1 + MAX_TOOL_ROUNDS);
        assert_eq!(h.broker.invocations.lock().unwrap().len(), MAX_TOOL_ROUNDS);
    }

    #[tokio::test]
    async fn exhaustion_prefers_trailing_content() {
        let mut responses: Vec<LlmResponse> = (0..MAX_TOOL_ROUNDS)
            .map(|_| tool_call_response("zapier_find_file", "{}"))
            .collect();
        let mut last = tool_call_response("zapier_find_file", "{}");
        last.content = "Partial answer so far.".to_owned();
        responses.push(last);

        let h = harness(responses, StubBroker::with_tools());
        let chat = h.storage.create_chat(None).await;

        let reply = h.engine.generate_reply(&chat.id, "loop", None).await.unwrap();
        assert_eq!(reply, "Partial answer so far.");
    }

    #[tokio::test]
    async fn empty_terminal_reply_passes_through() {
        // No tool calls requested, so empty content is the reply, not
        // the exhaustion fallback
        let h = harness(vec![text_response("")], StubBroker::with_tools());
        let chat = h.storage.create_chat(None).await;

        let reply = h.engine.generate_reply(&chat.id, "hi", None).await.unwrap();
        assert_eq!(reply, "");
        assert_eq!(h.provider.call_count(), 1);

        let history = h.storage.history(&chat.id).await;
        assert_eq!(history[1].role, "assistant");
        assert_eq!(history[1].content, "");
    }

    #[tokio::test]
    async fn malformed_arguments_proceed_empty() {
        let h = harness(
            vec![
                tool_call_response("zapier_find_file", "{"),
                text_response("done"),
            ],
            StubBroker::with_tools(),
        );
        let chat = h.storage.create_chat(None).await;

        h.engine.generate_reply(&chat.id, "go", None).await.unwrap();
        let invocations = h.broker.invocations.lock().unwrap();
        assert!(invocations[0].1.is_empty());
    }

    #[tokio::test]
    async fn failed_invocation_becomes_tool_result_text() {
        let mut broker = StubBroker::with_tools();
        broker.fail = true;
        let h = harness(
            vec![
                tool_call_response("zapier_find_file", "{}"),
                text_response("sorry, that failed"),
            ],
            broker,
        );
        let chat = h.storage.create_chat(None).await;

        let reply = h.engine.generate_reply(&chat.id, "go", None).await.unwrap();
        assert_eq!(reply, "sorry, that failed");

        let (messages, _) = h.provider.call(1);
        let tool_text = messages[2].content.as_deref().unwrap();
        assert!(tool_text.starts_with("Error:"));
    }

    #[tokio::test]
    async fn empty_catalog_omits_tools() {
        let h = harness(vec![text_response("ok")], StubBroker::empty());
        let chat = h.storage.create_chat(None).await;

        h.engine.generate_reply(&chat.id, "hi", None).await.unwrap();
        let (_, options) = h.provider.call(0);
        assert!(options.tools.is_none());
    }

    #[tokio::test]
    async fn agent_system_prompt_is_applied() {
        let h = harness(vec![text_response("ok")], StubBroker::empty());
        h.storage
            .add_agent(Agent {
                id: "a1".to_owned(),
                name: "Billing desk".to_owned(),
                system_prompt: Some("You handle billing questions.".to_owned()),
                supported_categories: "billing".to_owned(),
            })
            .await;
        let chat = h.storage.create_chat(None).await;
        h.storage.set_chat_agent(&chat.id, "a1").await.unwrap();

        h.engine.generate_reply(&chat.id, "hi", None).await.unwrap();
        let (_, options) = h.provider.call(0);
        assert_eq!(options.system_prompt.as_deref(), Some("You handle billing questions."));
    }

    #[tokio::test]
    async fn model_override_beats_pinned_and_default() {
        let h = harness(vec![text_response("ok")], StubBroker::empty());
        let chat = h.storage.create_chat(Some("scripted/pinned".to_owned())).await;

        h.engine
            .generate_reply(&chat.id, "hi", Some("scripted/override"))
            .await
            .unwrap();
        let (_, _) = h.provider.call(0);
        // Resolution happened against the override id
        assert_eq!(h.provider.call_count(), 1);
    }

    #[tokio::test]
    async fn no_provider_degrades_to_sentinel_reply() {
        let storage = Arc::new(MemoryStorage::new());
        let engine = ChatEngine::new(
            storage.clone(),
            Arc::new(ProviderRegistry::new()),
            Arc::new(StubBroker::empty()),
            "openrouter/auto",
        );
        let chat = storage.create_chat(None).await;

        let reply = engine.generate_reply(&chat.id, "hi", None).await.unwrap();
        assert!(reply.contains("No LLM provider"));
        // The degraded reply is still persisted
        let history = storage.history(&chat.id).await;
        assert_eq!(history.len(), 2);
    }
}
