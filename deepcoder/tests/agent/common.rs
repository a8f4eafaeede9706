//! Shared fixtures for agent integration tests

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use deepcoder::config::Settings;
use deepcoder_models::{async_trait, ModelBackend, ModelError, ModelInfo, ModelResponse};

#[derive(Debug)]
enum Reply {
    Content(String),
    ApiError(String),
    Transport,
}

#[derive(Debug, Default)]
struct ProbeState {
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

/// Shared view into a [`ScriptedBackend`] after it moved into the agent
#[derive(Clone)]
pub struct BackendProbe(Arc<ProbeState>);

impl BackendProbe {
    pub fn calls(&self) -> usize {
        self.0.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.0.prompts.lock().unwrap().clone()
    }
}

/// Backend that replays one scripted reply and records every prompt
#[derive(Debug)]
pub struct ScriptedBackend {
    reply: Reply,
    state: Arc<ProbeState>,
}

impl ScriptedBackend {
    pub fn with_content(content: &str) -> Self {
        Self::new(Reply::Content(content.to_string()))
    }

    /// A reply the provider flagged as erroneous
    pub fn with_api_error(message: &str) -> Self {
        Self::new(Reply::ApiError(message.to_string()))
    }

    /// A backend whose calls fail at the transport level
    pub fn failing() -> Self {
        Self::new(Reply::Transport)
    }

    pub fn probe(&self) -> BackendProbe {
        BackendProbe(Arc::clone(&self.state))
    }

    fn new(reply: Reply) -> Self {
        Self {
            reply,
            state: Arc::default(),
        }
    }
}

#[async_trait]
impl ModelBackend for ScriptedBackend {
    async fn generate(&self, prompt: &str) -> Result<ModelResponse, ModelError> {
        self.state.calls.fetch_add(1, Ordering::SeqCst);
        self.state.prompts.lock().unwrap().push(prompt.to_string());

        match &self.reply {
            Reply::Content(content) => Ok(ModelResponse::ok(content.clone(), serde_json::Value::Null)),
            Reply::ApiError(message) => Ok(ModelResponse::api_error(
                message.clone(),
                serde_json::Value::Null,
            )),
            Reply::Transport => Err(ModelError::MissingConfig("scripted transport failure")),
        }
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            provider: "scripted",
            model: "test".to_string(),
            endpoint: String::new(),
        }
    }
}

pub fn test_settings() -> Settings {
    Settings::default()
}

pub fn write_project_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}
