use axum::Json;
use axum::response::IntoResponse;
use http::StatusCode;

use concierge_chat::ChatError;
use concierge_core::HttpError;
use concierge_storage::StorageError;
use concierge_support::SupportError;

/// Domain error rendered as a JSON HTTP response
pub struct ErrorResponse {
    status: StatusCode,
    error_type: String,
    message: String,
}

impl ErrorResponse {
    fn of<E: HttpError>(e: &E) -> Self {
        Self {
            status: e.status_code(),
            error_type: e.error_type().to_owned(),
            message: e.client_message(),
        }
    }
}

impl From<ChatError> for ErrorResponse {
    fn from(e: ChatError) -> Self {
        Self::of(&e)
    }
}

impl From<SupportError> for ErrorResponse {
    fn from(e: SupportError) -> Self {
        Self::of(&e)
    }
}

impl From<StorageError> for ErrorResponse {
    fn from(e: StorageError) -> Self {
        Self::of(&e)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({
            "error": {
                "type": self.error_type,
                "message": self.message,
            }
        });

        (self.status, Json(body)).into_response()
    }
}
