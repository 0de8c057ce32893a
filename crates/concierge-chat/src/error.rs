use http::StatusCode;
use thiserror::Error;

use concierge_core::HttpError;
use concierge_storage::StorageError;

/// Orchestration errors
///
/// Provider and tool failures never surface here; they degrade into
/// reply text. Only a missing chat is a hard failure.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Referenced chat does not exist
    #[error("chat not found: {chat_id}")]
    ChatNotFound { chat_id: String },

    /// Persistence failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl HttpError for ChatError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ChatNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Storage(e) => e.status_code(),
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::ChatNotFound { .. } => "not_found",
            Self::Storage(e) => e.error_type(),
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::ChatNotFound { chat_id } => format!("chat not found: {chat_id}"),
            Self::Storage(e) => e.client_message(),
        }
    }
}
