//! Chat endpoints: creation, messaging, history, and support routing

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use concierge_core::{Chat, StoredMessage};
use concierge_storage::StorageError;

use crate::error::ErrorResponse;
use crate::state::AppState;

/// Request to create a chat
#[derive(Debug, Deserialize)]
pub struct CreateChatRequest {
    /// Pin the chat to a preferred model
    #[serde(default)]
    pub model: Option<String>,
}

pub async fn create_chat(State(state): State<AppState>, Json(req): Json<CreateChatRequest>) -> Json<Chat> {
    let chat = state.storage.create_chat(req.model).await;
    tracing::info!(chat = %chat.id, "chat created");
    Json(chat)
}

/// Request to send a user message
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Message text
    pub text: String,
    /// One-off model override for this message
    #[serde(default)]
    pub model: Option<String>,
}

/// Reply to a user message
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    /// Assistant reply text
    pub reply: String,
    /// Category assigned on first contact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Whether an agent was assigned on first contact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routed: Option<bool>,
}

/// Handle one user message
///
/// First contact additionally opens a ticket, classifies the message,
/// and routes the chat to an agent before generating the reply, so the
/// assigned agent's prompt already shapes the first answer.
pub async fn send_message(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, ErrorResponse> {
    let mut category = None;
    let mut routed = None;

    if state.storage.ticket_for_chat(&chat_id).await.is_none() {
        let (c, r) = state.desk.classify_and_route(&chat_id, &req.text).await?;
        category = Some(c);
        routed = Some(r);
    }

    let reply = state.engine.generate_reply(&chat_id, &req.text, req.model.as_deref()).await?;

    Ok(Json(SendMessageResponse { reply, category, routed }))
}

/// Chat history response
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// Persisted turns, oldest first
    pub messages: Vec<StoredMessage>,
}

pub async fn get_history(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<Json<HistoryResponse>, ErrorResponse> {
    if state.storage.get_chat(&chat_id).await.is_none() {
        return Err(StorageError::ChatNotFound { chat_id }.into());
    }

    let messages = state.storage.history(&chat_id).await;
    Ok(Json(HistoryResponse { messages }))
}

/// Request to (re)classify and route a chat's ticket
#[derive(Debug, Deserialize)]
pub struct SupportRequest {
    /// Text to classify, typically the latest user message
    pub text: String,
}

/// Outcome of classification and routing
#[derive(Debug, Serialize)]
pub struct SupportResponse {
    /// Ticket owned by the chat
    pub ticket_id: String,
    /// Assigned category
    pub category: String,
    /// Whether an agent was assigned
    pub routed: bool,
}

pub async fn route_support(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    Json(req): Json<SupportRequest>,
) -> Result<Json<SupportResponse>, ErrorResponse> {
    let (category, routed) = state.desk.classify_and_route(&chat_id, &req.text).await?;

    // classify_and_route just ensured the ticket exists
    let ticket_id = state
        .storage
        .ticket_for_chat(&chat_id)
        .await
        .map(|t| t.id)
        .ok_or(StorageError::ChatNotFound { chat_id })?;

    Ok(Json(SupportResponse {
        ticket_id,
        category,
        routed,
    }))
}
