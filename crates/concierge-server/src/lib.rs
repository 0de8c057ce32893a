//! HTTP surface for the Concierge backend
//!
//! Wires configuration into the provider registry, MCP connections,
//! storage, chat engine, and support desk, and exposes them over a
//! small JSON API.

mod agents;
mod chats;
mod error;
mod health;
mod providers;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use concierge_chat::ChatEngine;
use concierge_config::Config;
use concierge_llm::ProviderRegistry;
use concierge_mcp::ToolServers;
use concierge_storage::{MemoryStorage, Storage};
use concierge_support::SupportDesk;

pub use state::AppState;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// MCP servers that fail to connect are skipped; a missing provider
    /// credential degrades replies rather than failing startup.
    pub async fn new(config: Config) -> Self {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let registry = Arc::new(ProviderRegistry::from_config(&config.llm));
        let tools = Arc::new(ToolServers::connect(&config.mcp).await);
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());

        let engine = Arc::new(ChatEngine::new(
            storage.clone(),
            registry.clone(),
            tools,
            config.llm.default_model.clone(),
        ));
        let desk = Arc::new(SupportDesk::new(storage.clone(), registry.clone(), config.support));

        let state = AppState {
            storage,
            registry,
            engine,
            desk,
        };

        Self {
            router: router(state),
            listen_address,
        }
    }

    /// Bind the configured address
    ///
    /// Listening on port 0 picks an ephemeral port; the bound server
    /// reports the actual address.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener fails
    pub async fn bind(self) -> anyhow::Result<BoundServer> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;

        Ok(BoundServer {
            listener,
            router: self.router,
            local_addr,
        })
    }

    /// Bind and serve in one step
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        self.bind().await?.serve(shutdown).await
    }
}

/// Server holding a bound TCP listener, ready to serve
pub struct BoundServer {
    listener: tokio::net::TcpListener,
    router: Router,
    local_addr: SocketAddr,
}

impl BoundServer {
    /// Address the listener actually bound to
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        tracing::info!(local_addr = %self.local_addr, "server listening");

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}

/// Build the API router over prepared state
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/v1/chats", post(chats::create_chat))
        .route(
            "/v1/chats/{chat_id}/messages",
            post(chats::send_message).get(chats::get_history),
        )
        .route("/v1/chats/{chat_id}/support", post(chats::route_support))
        .route("/v1/agents", post(agents::create_agent).get(agents::list_agents))
        .route("/v1/providers", get(providers::list_providers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
