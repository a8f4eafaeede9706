//! Model configuration shared by every backend

use serde::{Deserialize, Serialize};

/// Generation parameters sent with every chat-completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
    pub stop: Option<Vec<String>>,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: 2000,
            top_p: 0.95,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            stop: None,
        }
    }
}

/// Which platform hosts the model and how to reach it
///
/// The `platform` tag selects the backend ("deepseek", "togetherai" or
/// "lightningai"); the remaining fields carry whatever that backend needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub platform: String,
    /// DeepSeek model family: "coder-v3", "v3-base" or "r1"
    pub model_type: String,
    pub deepseek_api_key: Option<String>,
    pub together_api_key: Option<String>,
    /// Route DeepSeek requests through a Lightning.ai deployment
    pub use_lightning: bool,
    pub lightning_endpoint_url: Option<String>,
    pub lightning_api_key: Option<String>,
    /// Override for the platform API base URL
    pub api_base: Option<String>,
    pub parameters: ModelParameters,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            platform: "deepseek".to_string(),
            model_type: "coder-v3".to_string(),
            deepseek_api_key: None,
            together_api_key: None,
            use_lightning: false,
            lightning_endpoint_url: None,
            lightning_api_key: None,
            api_base: None,
            parameters: ModelParameters::default(),
        }
    }
}
