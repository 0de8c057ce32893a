//! Provider capability listing

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

/// One configured and credentialed provider
#[derive(Debug, Serialize)]
pub struct ProviderInfo {
    /// Provider id, the model-prefix it serves
    pub id: String,
    /// Human-readable name
    pub name: String,
}

/// Providers ready to serve completions
#[derive(Debug, Serialize)]
pub struct ListProvidersResponse {
    pub providers: Vec<ProviderInfo>,
}

pub async fn list_providers(State(state): State<AppState>) -> Json<ListProvidersResponse> {
    let providers = state
        .registry
        .list_available()
        .into_iter()
        .map(|(id, name)| ProviderInfo { id, name })
        .collect();
    Json(ListProvidersResponse { providers })
}
