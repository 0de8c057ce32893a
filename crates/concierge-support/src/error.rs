use http::StatusCode;
use thiserror::Error;

use concierge_core::HttpError;
use concierge_storage::StorageError;

/// Support-desk errors
#[derive(Debug, Error)]
pub enum SupportError {
    /// Referenced ticket does not exist
    #[error("ticket not found: {ticket_id}")]
    TicketNotFound { ticket_id: String },

    /// Persistence failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl HttpError for SupportError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::TicketNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Storage(e) => e.status_code(),
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::TicketNotFound { .. } => "not_found",
            Self::Storage(e) => e.error_type(),
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::TicketNotFound { ticket_id } => format!("ticket not found: {ticket_id}"),
            Self::Storage(e) => e.client_message(),
        }
    }
}
