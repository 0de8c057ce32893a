//! Persistence seam for chats, messages, agents, and tickets
//!
//! The [`Storage`] trait is the only thing the orchestration layers see;
//! [`MemoryStorage`] is the in-process implementation behind it.

mod error;
mod memory;

use async_trait::async_trait;

use concierge_core::{Agent, Chat, StoredMessage, Ticket};

pub use error::StorageError;
pub use memory::MemoryStorage;

/// Persistence operations the chat and support layers depend on
#[async_trait]
pub trait Storage: Send + Sync {
    /// Create a chat, optionally pinned to a preferred model
    async fn create_chat(&self, model_id: Option<String>) -> Chat;

    /// Look up a chat by id
    async fn get_chat(&self, chat_id: &str) -> Option<Chat>;

    /// Point a chat at an agent so its system prompt shapes replies
    async fn set_chat_agent(&self, chat_id: &str, agent_id: &str) -> Result<(), StorageError>;

    /// Full message history of a chat, oldest first
    async fn history(&self, chat_id: &str) -> Vec<StoredMessage>;

    /// Append one turn to a chat's history
    async fn append_message(&self, chat_id: &str, message: StoredMessage) -> Result<(), StorageError>;

    /// Register an agent
    async fn add_agent(&self, agent: Agent);

    /// Look up an agent by id
    async fn get_agent(&self, agent_id: &str) -> Option<Agent>;

    /// All agents, in registration order
    async fn list_agents(&self) -> Vec<Agent>;

    /// Look up a ticket by id
    async fn get_ticket(&self, ticket_id: &str) -> Option<Ticket>;

    /// The ticket owned by a chat, if one has been created
    async fn ticket_for_chat(&self, chat_id: &str) -> Option<Ticket>;

    /// Create an open ticket for an existing chat
    async fn create_ticket(&self, chat_id: &str) -> Result<Ticket, StorageError>;

    /// Replace a ticket record
    async fn update_ticket(&self, ticket: Ticket) -> Result<(), StorageError>;
}
