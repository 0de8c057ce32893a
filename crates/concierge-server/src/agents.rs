//! Agent registration endpoints

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use concierge_core::Agent;

use crate::state::AppState;

/// Request to register an agent
#[derive(Debug, Deserialize)]
pub struct CreateAgentRequest {
    /// Display name
    pub name: String,
    /// System prompt injected when this agent owns a chat
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Comma-delimited categories this agent covers
    #[serde(default)]
    pub supported_categories: String,
}

pub async fn create_agent(State(state): State<AppState>, Json(req): Json<CreateAgentRequest>) -> Json<Agent> {
    let agent = Agent {
        id: Uuid::new_v4().to_string(),
        name: req.name,
        system_prompt: req.system_prompt,
        supported_categories: req.supported_categories,
    };
    state.storage.add_agent(agent.clone()).await;
    tracing::info!(agent = %agent.id, name = %agent.name, "agent registered");
    Json(agent)
}

/// Registered agents, in registration order
#[derive(Debug, Serialize)]
pub struct ListAgentsResponse {
    pub agents: Vec<Agent>,
}

pub async fn list_agents(State(state): State<AppState>) -> Json<ListAgentsResponse> {
    Json(ListAgentsResponse {
        agents: state.storage.list_agents().await,
    })
}
