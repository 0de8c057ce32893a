use serde::{Deserialize, Serialize};

/// Lifecycle state of a support ticket
///
/// Monotonic except that `Escalated` is reachable from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    /// Created, not yet assigned
    Open,
    /// Assigned to an agent
    Assigned,
    /// Resolved by an agent
    Resolved,
    /// Escalated out of the normal flow
    Escalated,
}

/// Support-tracking record derived from a chat
///
/// One ticket per chat, created lazily on the first user message. The
/// classifier/router pair owns the lifecycle; nothing else mutates
/// `status`, `category`, or `assigned_agent_id` after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique ticket identifier
    pub id: String,
    /// Owning chat
    pub chat_id: String,
    /// Lifecycle state
    pub status: TicketStatus,
    /// Support category, defaults to "general"
    pub category: String,
    /// Agent this ticket is assigned to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_agent_id: Option<String>,
    /// Priority, defaults to 0
    #[serde(default)]
    pub priority: i32,
}

impl Ticket {
    /// Create a fresh open ticket for a chat
    pub fn open(id: String, chat_id: String) -> Self {
        Self {
            id,
            chat_id,
            status: TicketStatus::Open,
            category: "general".to_owned(),
            assigned_agent_id: None,
            priority: 0,
        }
    }
}
