//! Together.ai chat-completion backend

use reqwest::Client;

use crate::backend::{ModelBackend, ModelInfo, ModelResponse};
use crate::chat::{chat_payload, post_chat};
use crate::error::ModelError;
use crate::settings::{ModelParameters, ModelSettings};
use async_trait::async_trait;

const API_BASE: &str = "https://api.together.xyz/v1";
const MODEL_NAME: &str = "deepseek-ai/deepseek-coder-v3";

#[derive(Debug)]
pub struct TogetherBackend {
    client: Client,
    api_base: String,
    api_key: String,
    model_name: String,
    params: ModelParameters,
}

impl TogetherBackend {
    pub fn new(settings: &ModelSettings) -> Result<Self, ModelError> {
        let api_key = settings
            .together_api_key
            .clone()
            .ok_or(ModelError::MissingConfig("Together.ai API key"))?;

        Ok(Self {
            client: Client::new(),
            api_base: settings
                .api_base
                .clone()
                .unwrap_or_else(|| API_BASE.to_string()),
            api_key,
            model_name: MODEL_NAME.to_string(),
            params: settings.parameters.clone(),
        })
    }
}

#[async_trait]
impl ModelBackend for TogetherBackend {
    async fn generate(&self, prompt: &str) -> Result<ModelResponse, ModelError> {
        let payload = chat_payload(Some(&self.model_name), prompt, &self.params);
        let url = format!("{}/chat/completions", self.api_base);
        post_chat(&self.client, &url, &self.api_key, payload).await
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            provider: "Together.ai",
            model: self.model_name.clone(),
            endpoint: self.api_base.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_api_key() {
        let err = TogetherBackend::new(&ModelSettings::default()).unwrap_err();
        assert!(matches!(
            err,
            ModelError::MissingConfig("Together.ai API key")
        ));
    }

    #[test]
    fn api_base_can_be_overridden() {
        let settings = ModelSettings {
            together_api_key: Some("key".to_string()),
            api_base: Some("http://localhost:8080/v1".to_string()),
            ..ModelSettings::default()
        };
        let backend = TogetherBackend::new(&settings).unwrap();
        assert_eq!(backend.info().endpoint, "http://localhost:8080/v1");
    }
}
