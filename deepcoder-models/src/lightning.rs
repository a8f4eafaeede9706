//! Lightning.ai chat-completion backend
//!
//! Posts straight to a configured deployment URL; the deployment decides
//! which model serves the request, so no model id is sent. An
//! OpenAI-compatible response format is assumed.

use reqwest::Client;

use crate::backend::{ModelBackend, ModelInfo, ModelResponse};
use crate::chat::{chat_payload, post_chat};
use crate::error::ModelError;
use crate::settings::{ModelParameters, ModelSettings};
use async_trait::async_trait;

#[derive(Debug)]
pub struct LightningBackend {
    client: Client,
    endpoint_url: String,
    api_key: String,
    params: ModelParameters,
}

impl LightningBackend {
    pub fn new(settings: &ModelSettings) -> Result<Self, ModelError> {
        let endpoint_url = settings
            .lightning_endpoint_url
            .clone()
            .ok_or(ModelError::MissingConfig("Lightning AI endpoint URL"))?;
        let api_key = settings
            .lightning_api_key
            .clone()
            .ok_or(ModelError::MissingConfig("Lightning AI API key"))?;

        Ok(Self {
            client: Client::new(),
            endpoint_url,
            api_key,
            params: settings.parameters.clone(),
        })
    }
}

#[async_trait]
impl ModelBackend for LightningBackend {
    async fn generate(&self, prompt: &str) -> Result<ModelResponse, ModelError> {
        let payload = chat_payload(None, prompt, &self.params);
        post_chat(&self.client, &self.endpoint_url, &self.api_key, payload).await
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            provider: "Lightning AI",
            model: String::new(),
            endpoint: self.endpoint_url.clone(),
        }
    }
}
