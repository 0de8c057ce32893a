//! Ticket lifecycle: lazy creation, classification, and routing

use std::sync::Arc;

use concierge_config::SupportConfig;
use concierge_core::TicketStatus;
use concierge_llm::{ChatMessage, ChatOptions, ProviderRegistry, FINISH_REASON_ERROR};
use concierge_storage::Storage;

use crate::classifier::{build_prompt, pick_category, DEFAULT_CATEGORY};
use crate::error::SupportError;

/// Classification calls are cheap and tightly capped
const CLASSIFY_MAX_TOKENS: u32 = 20;

/// Classifies tickets and routes them to agents
pub struct SupportDesk {
    storage: Arc<dyn Storage>,
    registry: Arc<ProviderRegistry>,
    config: SupportConfig,
}

impl SupportDesk {
    /// Build a desk over shared storage and providers
    pub fn new(storage: Arc<dyn Storage>, registry: Arc<ProviderRegistry>, config: SupportConfig) -> Self {
        Self {
            storage,
            registry,
            config,
        }
    }

    /// Classify a user message into one configured category
    ///
    /// Classification never fails: a missing provider or a degraded
    /// response falls back to the default category.
    pub async fn classify(&self, text: &str) -> String {
        let Some((_, provider)) = self.registry.resolve(&self.config.classify_model) else {
            return DEFAULT_CATEGORY.to_owned();
        };

        let options = ChatOptions {
            temperature: 0.0,
            max_tokens: CLASSIFY_MAX_TOKENS,
            ..ChatOptions::default()
        };
        let messages = [ChatMessage::user(build_prompt(&self.config.categories, text))];

        let response = provider.chat(&messages, &self.config.classify_model, &options).await;
        if response.finish_reason.as_deref() == Some(FINISH_REASON_ERROR) {
            return DEFAULT_CATEGORY.to_owned();
        }

        pick_category(&self.config.categories, &response.content)
    }

    /// Assign a ticket to the first agent covering `category`
    ///
    /// Agents that declare the category are preferred; with none, any
    /// agent will do. `Ok(false)` means no agents exist at all and the
    /// ticket is left untouched. Re-routing an already assigned ticket
    /// is allowed and converges on the same agent.
    pub async fn route(&self, ticket_id: &str, category: &str) -> Result<bool, SupportError> {
        let mut ticket = self
            .storage
            .get_ticket(ticket_id)
            .await
            .ok_or_else(|| SupportError::TicketNotFound {
                ticket_id: ticket_id.to_owned(),
            })?;

        let agents = self.storage.list_agents().await;
        let candidate = agents
            .iter()
            .find(|agent| agent.supports_category(category))
            .or_else(|| agents.first());

        let Some(agent) = candidate else {
            tracing::warn!(ticket = ticket_id, category, "no agents registered, ticket left unassigned");
            return Ok(false);
        };

        tracing::info!(ticket = ticket_id, category, agent = %agent.id, "ticket routed");

        ticket.category = category.to_owned();
        ticket.assigned_agent_id = Some(agent.id.clone());
        ticket.status = TicketStatus::Assigned;
        let chat_id = ticket.chat_id.clone();
        self.storage.update_ticket(ticket).await?;
        self.storage.set_chat_agent(&chat_id, &agent.id).await?;

        Ok(true)
    }

    /// Classify a message and route the chat's ticket in one step
    ///
    /// The ticket is created lazily on first use. Returns the category
    /// and whether an agent was assigned.
    pub async fn classify_and_route(&self, chat_id: &str, text: &str) -> Result<(String, bool), SupportError> {
        let ticket = match self.storage.ticket_for_chat(chat_id).await {
            Some(ticket) => ticket,
            None => self.storage.create_ticket(chat_id).await?,
        };

        let category = self.classify(text).await;
        let routed = self.route(&ticket.id, &category).await?;
        Ok((category, routed))
    }
}
