//! Shared OpenAI-style chat-completion plumbing
//!
//! Every supported platform speaks the same request/response shape, so the
//! payload construction and response handling live here and the backends
//! only differ in endpoint, credentials and model naming.

use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::backend::ModelResponse;
use crate::error::ModelError;
use crate::settings::ModelParameters;

/// Build a chat-completion payload for a single user prompt.
///
/// `model` is omitted for endpoints that pin the model server-side
/// (Lightning.ai deployments).
pub(crate) fn chat_payload(model: Option<&str>, prompt: &str, params: &ModelParameters) -> Value {
    let mut payload = json!({
        "messages": [{"role": "user", "content": prompt}],
        "temperature": params.temperature,
        "max_tokens": params.max_tokens,
        "top_p": params.top_p,
        "frequency_penalty": params.frequency_penalty,
        "presence_penalty": params.presence_penalty,
    });

    if let Some(model) = model {
        payload["model"] = json!(model);
    }
    if let Some(stop) = &params.stop {
        payload["stop"] = json!(stop);
    }

    payload
}

/// POST the payload and turn the reply into a [`ModelResponse`].
///
/// Non-2xx statuses become flagged responses, not `Err`: the provider
/// answered, it just refused the request.
pub(crate) async fn post_chat(
    client: &Client,
    url: &str,
    api_key: &str,
    payload: Value,
) -> Result<ModelResponse, ModelError> {
    debug!(url, "sending chat-completion request");

    let response = client
        .post(url)
        .bearer_auth(api_key)
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    let raw: Value = response.json().await?;

    if !status.is_success() {
        let message = raw
            .pointer("/error/message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| raw.to_string());
        return Ok(ModelResponse::api_error(
            format!("API Error ({}): {}", status.as_u16(), message),
            raw,
        ));
    }

    let content = raw
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Ok(ModelResponse::ok(content, raw))
}
