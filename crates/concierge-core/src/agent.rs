use serde::{Deserialize, Serialize};

/// A support agent that conversations and tickets can be routed to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Unique agent identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// System prompt injected when this agent owns a chat
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Comma-delimited category list, in declaration order
    #[serde(default)]
    pub supported_categories: String,
}

impl Agent {
    /// Whether this agent declares support for `category`
    ///
    /// Membership is a case-insensitive, trimmed comma-split test over
    /// `supported_categories`.
    pub fn supports_category(&self, category: &str) -> bool {
        let wanted = category.trim().to_lowercase();
        self.supported_categories
            .split(',')
            .map(|c| c.trim().to_lowercase())
            .any(|c| !c.is_empty() && c == wanted)
    }
}
