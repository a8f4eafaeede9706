//! DeepSeek chat-completion backend
//!
//! Talks to platform.deepseek.com directly, or to a Lightning.ai
//! deployment hosting a DeepSeek model when `use_lightning` is set.

use reqwest::Client;

use crate::backend::{ModelBackend, ModelInfo, ModelResponse};
use crate::chat::{chat_payload, post_chat};
use crate::error::ModelError;
use crate::settings::{ModelParameters, ModelSettings};
use async_trait::async_trait;

/// Default platform endpoint
const API_BASE: &str = "https://api.deepseek.com/v1";

/// Map the short model-type tag onto the provider's model identifier
fn model_id(model_type: &str) -> &'static str {
    match model_type {
        "v3-base" => "deepseek-ai/deepseek-v3-base",
        "r1" => "deepseek-ai/deepseek-r1",
        _ => "deepseek-ai/deepseek-coder-v3",
    }
}

#[derive(Debug)]
enum Route {
    Direct { api_base: String, api_key: String },
    Lightning { endpoint_url: String, api_key: String },
}

#[derive(Debug)]
pub struct DeepSeekBackend {
    client: Client,
    model_name: &'static str,
    params: ModelParameters,
    route: Route,
}

impl DeepSeekBackend {
    pub fn new(settings: &ModelSettings) -> Result<Self, ModelError> {
        let route = if settings.use_lightning {
            Route::Lightning {
                endpoint_url: settings
                    .lightning_endpoint_url
                    .clone()
                    .ok_or(ModelError::MissingConfig("Lightning AI endpoint URL"))?,
                api_key: settings
                    .lightning_api_key
                    .clone()
                    .ok_or(ModelError::MissingConfig("Lightning AI API key"))?,
            }
        } else {
            Route::Direct {
                api_base: settings
                    .api_base
                    .clone()
                    .unwrap_or_else(|| API_BASE.to_string()),
                api_key: settings
                    .deepseek_api_key
                    .clone()
                    .ok_or(ModelError::MissingConfig("DeepSeek API key"))?,
            }
        };

        Ok(Self {
            client: Client::new(),
            model_name: model_id(&settings.model_type),
            params: settings.parameters.clone(),
            route,
        })
    }
}

#[async_trait]
impl ModelBackend for DeepSeekBackend {
    async fn generate(&self, prompt: &str) -> Result<ModelResponse, ModelError> {
        match &self.route {
            Route::Direct { api_base, api_key } => {
                let payload = chat_payload(Some(self.model_name), prompt, &self.params);
                let url = format!("{api_base}/chat/completions");
                post_chat(&self.client, &url, api_key, payload).await
            }
            // Lightning deployments pin the model server-side
            Route::Lightning {
                endpoint_url,
                api_key,
            } => {
                let payload = chat_payload(None, prompt, &self.params);
                post_chat(&self.client, endpoint_url, api_key, payload).await
            }
        }
    }

    fn info(&self) -> ModelInfo {
        match &self.route {
            Route::Direct { api_base, .. } => ModelInfo {
                provider: "DeepSeek",
                model: self.model_name.to_string(),
                endpoint: api_base.clone(),
            },
            Route::Lightning { endpoint_url, .. } => ModelInfo {
                provider: "DeepSeek via Lightning AI",
                model: self.model_name.to_string(),
                endpoint: endpoint_url.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_id_maps_known_types() {
        assert_eq!(model_id("coder-v3"), "deepseek-ai/deepseek-coder-v3");
        assert_eq!(model_id("v3-base"), "deepseek-ai/deepseek-v3-base");
        assert_eq!(model_id("r1"), "deepseek-ai/deepseek-r1");
        // Unknown tags fall back to the coder model
        assert_eq!(model_id("something-else"), "deepseek-ai/deepseek-coder-v3");
    }

    #[test]
    fn direct_route_requires_api_key() {
        let settings = ModelSettings::default();
        let err = DeepSeekBackend::new(&settings).unwrap_err();
        assert!(matches!(err, ModelError::MissingConfig(_)));
    }

    #[test]
    fn lightning_route_requires_endpoint_and_key() {
        let settings = ModelSettings {
            use_lightning: true,
            lightning_api_key: Some("key".to_string()),
            ..ModelSettings::default()
        };
        let err = DeepSeekBackend::new(&settings).unwrap_err();
        assert!(matches!(
            err,
            ModelError::MissingConfig("Lightning AI endpoint URL")
        ));
    }

    #[test]
    fn info_reports_lightning_endpoint() {
        let settings = ModelSettings {
            use_lightning: true,
            lightning_endpoint_url: Some("https://example.litng.ai/v1".to_string()),
            lightning_api_key: Some("key".to_string()),
            ..ModelSettings::default()
        };
        let backend = DeepSeekBackend::new(&settings).unwrap();
        let info = backend.info();
        assert_eq!(info.provider, "DeepSeek via Lightning AI");
        assert_eq!(info.endpoint, "https://example.litng.ai/v1");
    }
}
