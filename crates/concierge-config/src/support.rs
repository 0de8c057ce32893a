use serde::Deserialize;

/// Ticket classification and routing configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SupportConfig {
    /// Categories the classifier may assign, in declaration order
    ///
    /// Match order matters: the first category contained in the model
    /// output wins.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    /// Model used for classification calls
    #[serde(default = "default_classify_model")]
    pub classify_model: String,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            classify_model: default_classify_model(),
        }
    }
}

fn default_categories() -> Vec<String> {
    ["technical", "billing", "general", "other"]
        .map(str::to_owned)
        .to_vec()
}

fn default_classify_model() -> String {
    crate::llm::DEFAULT_MODEL.to_owned()
}
