//! In-process storage backed by a single lock

use std::collections::HashMap;

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use concierge_core::{Agent, Chat, StoredMessage, Ticket};

use crate::error::StorageError;
use crate::Storage;

#[derive(Default)]
struct Inner {
    chats: HashMap<String, Chat>,
    messages: HashMap<String, Vec<StoredMessage>>,
    // Registration order doubles as routing precedence
    agents: IndexMap<String, Agent>,
    tickets: HashMap<String, Ticket>,
}

/// In-memory storage
///
/// All state lives behind one lock; contention is negligible at the
/// request rates this serves.
#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<Inner>,
}

impl MemoryStorage {
    /// Empty storage
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create_chat(&self, model_id: Option<String>) -> Chat {
        let chat = Chat {
            id: Uuid::new_v4().to_string(),
            model_id,
            agent_id: None,
        };
        let mut inner = self.inner.write().await;
        inner.chats.insert(chat.id.clone(), chat.clone());
        chat
    }

    async fn get_chat(&self, chat_id: &str) -> Option<Chat> {
        self.inner.read().await.chats.get(chat_id).cloned()
    }

    async fn set_chat_agent(&self, chat_id: &str, agent_id: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;
        let chat = inner.chats.get_mut(chat_id).ok_or_else(|| StorageError::ChatNotFound {
            chat_id: chat_id.to_owned(),
        })?;
        chat.agent_id = Some(agent_id.to_owned());
        Ok(())
    }

    async fn history(&self, chat_id: &str) -> Vec<StoredMessage> {
        self.inner.read().await.messages.get(chat_id).cloned().unwrap_or_default()
    }

    async fn append_message(&self, chat_id: &str, message: StoredMessage) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;
        if !inner.chats.contains_key(chat_id) {
            return Err(StorageError::ChatNotFound {
                chat_id: chat_id.to_owned(),
            });
        }
        inner.messages.entry(chat_id.to_owned()).or_default().push(message);
        Ok(())
    }

    async fn add_agent(&self, agent: Agent) {
        self.inner.write().await.agents.insert(agent.id.clone(), agent);
    }

    async fn get_agent(&self, agent_id: &str) -> Option<Agent> {
        self.inner.read().await.agents.get(agent_id).cloned()
    }

    async fn list_agents(&self) -> Vec<Agent> {
        self.inner.read().await.agents.values().cloned().collect()
    }

    async fn get_ticket(&self, ticket_id: &str) -> Option<Ticket> {
        self.inner.read().await.tickets.get(ticket_id).cloned()
    }

    async fn ticket_for_chat(&self, chat_id: &str) -> Option<Ticket> {
        self.inner
            .read()
            .await
            .tickets
            .values()
            .find(|t| t.chat_id == chat_id)
            .cloned()
    }

    async fn create_ticket(&self, chat_id: &str) -> Result<Ticket, StorageError> {
        let mut inner = self.inner.write().await;
        if !inner.chats.contains_key(chat_id) {
            return Err(StorageError::ChatNotFound {
                chat_id: chat_id.to_owned(),
            });
        }
        let ticket = Ticket::open(Uuid::new_v4().to_string(), chat_id.to_owned());
        inner.tickets.insert(ticket.id.clone(), ticket.clone());
        Ok(ticket)
    }

    async fn update_ticket(&self, ticket: Ticket) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;
        if !inner.tickets.contains_key(&ticket.id) {
            return Err(StorageError::TicketNotFound {
                ticket_id: ticket.id.clone(),
            });
        }
        inner.tickets.insert(ticket.id.clone(), ticket);
        Ok(())
    }
}
