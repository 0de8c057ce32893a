use http::StatusCode;
use thiserror::Error;

use concierge_core::HttpError;

/// Persistence errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Referenced chat does not exist
    #[error("chat not found: {chat_id}")]
    ChatNotFound { chat_id: String },

    /// Referenced ticket does not exist
    #[error("ticket not found: {ticket_id}")]
    TicketNotFound { ticket_id: String },
}

impl HttpError for StorageError {
    fn status_code(&self) -> StatusCode {
        StatusCode::NOT_FOUND
    }

    fn error_type(&self) -> &str {
        "not_found"
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}
