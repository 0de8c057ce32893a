//! Programmatic configuration builder for integration tests

use secrecy::SecretString;
use concierge_config::{Config, LlmProviderConfig, LlmProviderType};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal defaults: no providers, no MCP servers
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Point a provider at a mock backend and make it the default
    ///
    /// The default and classification models are routed through it too,
    /// so every completion in the test hits the mock.
    pub fn with_provider(mut self, name: &str, base_url: &str) -> Self {
        self.config.llm.providers.insert(
            name.to_owned(),
            LlmProviderConfig {
                provider_type: LlmProviderType::Openrouter,
                api_key: Some(SecretString::from("test-key")),
                base_url: Some(base_url.parse().expect("valid URL")),
                display_name: None,
            },
        );
        self.config.llm.default_provider = Some(name.to_owned());
        self.config.llm.default_model = format!("{name}/mock-model");
        self.config.support.classify_model = format!("{name}/mock-model");
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
