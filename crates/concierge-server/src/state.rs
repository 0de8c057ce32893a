use std::sync::Arc;

use concierge_chat::ChatEngine;
use concierge_llm::ProviderRegistry;
use concierge_storage::Storage;
use concierge_support::SupportDesk;

/// Shared state behind every handler
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend
    pub storage: Arc<dyn Storage>,
    /// Provider registry for capability listing
    pub registry: Arc<ProviderRegistry>,
    /// Reply orchestrator
    pub engine: Arc<ChatEngine>,
    /// Ticket classifier and router
    pub desk: Arc<SupportDesk>,
}
