use serde::{Deserialize, Serialize};

/// A conversation owned by one account on one channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    /// Unique chat identifier
    pub id: String,
    /// Preferred model for this chat, if the user picked one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    /// Agent whose system prompt shapes replies in this chat
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
}

/// One persisted conversation turn
///
/// Only role and text survive persistence; tool-call plumbing is
/// transient within a single orchestration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Message role ("user", "assistant", "system")
    pub role: String,
    /// Message text
    pub content: String,
}
