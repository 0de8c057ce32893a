//! Provider registry and model-id resolution

use std::sync::Arc;

use indexmap::IndexMap;

use concierge_config::{LlmConfig, LlmProviderType};

use crate::provider::Provider;
use crate::provider::openrouter::OpenRouterProvider;

/// Read-only registry mapping provider ids to provider instances
///
/// Built once at startup and passed by `Arc` into everything that needs
/// completions; there is no dynamic registration during request
/// handling.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: IndexMap<String, Arc<dyn Provider>>,
    default_provider: Option<String>,
}

impl ProviderRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry from configuration
    ///
    /// The default provider is the configured one, falling back to
    /// `openrouter` when a provider is registered under that id.
    pub fn from_config(config: &LlmConfig) -> Self {
        let mut registry = Self::new();

        for (id, provider_config) in &config.providers {
            let provider: Arc<dyn Provider> = match provider_config.provider_type {
                LlmProviderType::Openrouter => Arc::new(OpenRouterProvider::new(id.clone(), provider_config)),
            };
            registry.register(provider);
        }

        let default = config
            .default_provider
            .clone()
            .or_else(|| registry.providers.contains_key("openrouter").then(|| "openrouter".to_owned()));
        if let Some(default) = default {
            registry.set_default(default);
        }

        registry
    }

    /// Register a provider under its own id
    pub fn register(&mut self, provider: Arc<dyn Provider>) {
        self.providers.insert(provider.id().to_owned(), provider);
    }

    /// Mark a registered provider id as the fallback for unprefixed
    /// model ids
    pub fn set_default(&mut self, provider_id: impl Into<String>) {
        self.default_provider = Some(provider_id.into());
    }

    /// Resolve a model id to the provider that serves it
    ///
    /// A `/`-delimited prefix matching a registered provider id wins;
    /// otherwise the default provider handles the model. `None` means no
    /// provider is available and the caller must degrade explicitly.
    pub fn resolve(&self, model_id: &str) -> Option<(String, Arc<dyn Provider>)> {
        if let Some((prefix, _)) = model_id.split_once('/')
            && let Some(provider) = self.providers.get(prefix)
        {
            return Some((prefix.to_owned(), Arc::clone(provider)));
        }

        let default = self.default_provider.as_deref()?;
        self.providers
            .get(default)
            .map(|provider| (default.to_owned(), Arc::clone(provider)))
    }

    /// Providers that are minimally configured, in registration order
    pub fn list_available(&self) -> Vec<(String, String)> {
        self.providers
            .iter()
            .filter(|(_, p)| p.is_available())
            .map(|(id, p)| (id.clone(), p.display_name().to_owned()))
            .collect()
    }
}
