use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Default model used when neither the request nor the chat names one
pub const DEFAULT_MODEL: &str = "openrouter/auto";

/// Top-level LLM configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// LLM provider configurations keyed by provider id
    ///
    /// The provider id is the `/`-delimited model prefix used for
    /// resolution (e.g. `openrouter` for `openrouter/auto`).
    #[serde(default)]
    pub providers: IndexMap<String, LlmProviderConfig>,
    /// Provider used for model ids with no recognized prefix
    #[serde(default)]
    pub default_provider: Option<String>,
    /// Model used when a chat has no model preference
    #[serde(default = "default_model")]
    pub default_model: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_owned()
}

/// Configuration for a single LLM provider
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmProviderConfig {
    /// Provider protocol type
    #[serde(rename = "type")]
    pub provider_type: LlmProviderType,
    /// API key for authentication
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Human-readable name for capability listings
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Supported LLM provider protocols
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProviderType {
    /// OpenRouter (OpenAI-compatible chat completions API)
    Openrouter,
}
