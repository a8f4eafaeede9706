//! Configuration loading: defaults, config file, environment, CLI flags
//!
//! Sources are folded in that order, later ones winning. The config file
//! is YAML, looked up first under the user config directory and then as
//! `.deepcoder.yaml` in the project root. A `.env` file is honored before
//! environment variables are read.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use deepcoder_models::ModelSettings;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Platforms the backend factory can build
const KNOWN_PLATFORMS: [&str; 3] = ["deepseek", "togetherai", "lightningai"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub model: ModelSettings,
    pub logging: LoggingSettings,
    pub git: GitSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log verbosity; output always goes to stderr
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GitSettings {
    pub auto_stage: bool,
    pub auto_commit: bool,
}

impl Settings {
    /// Load settings from the first config file found, then apply
    /// environment overrides.
    pub fn load(project_root: &Path) -> Result<Self> {
        dotenv::dotenv().ok();

        let mut settings = match find_config_file(project_root) {
            Some(path) => {
                debug!(path = %path.display(), "loading config file");
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                serde_yaml::from_str(&contents)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?
            }
            None => Self::default(),
        };

        settings.apply_env();
        Ok(settings)
    }

    /// Fold environment variables over whatever the file provided.
    pub fn apply_env(&mut self) {
        if let Ok(platform) = env::var("MODEL_HOST_PLATFORM") {
            self.model.platform = platform.to_lowercase();
        }
        if let Ok(key) = env::var("DEEPSEEK_API_KEY") {
            self.model.deepseek_api_key = Some(key);
        }
        if let Ok(model_type) = env::var("DEEPSEEK_MODEL_TYPE") {
            self.model.model_type = model_type;
        }
        if let Ok(value) = env::var("DEEPSEEK_USE_LIGHTNING") {
            self.model.use_lightning = is_truthy(&value);
        }
        if let Ok(key) = env::var("TOGETHER_API_KEY") {
            self.model.together_api_key = Some(key);
        }
        if let Ok(url) = env::var("LIGHTNING_ENDPOINT_URL") {
            self.model.lightning_endpoint_url = Some(url);
        }
        if let Ok(key) = env::var("LIGHTNING_API_KEY") {
            self.model.lightning_api_key = Some(key);
        }
        if let Ok(level) = env::var("DEEPCODER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(value) = env::var("DEEPCODER_GIT_AUTO_STAGE") {
            self.git.auto_stage = is_truthy(&value);
        }
        if let Ok(value) = env::var("DEEPCODER_GIT_AUTO_COMMIT") {
            self.git.auto_commit = is_truthy(&value);
        }
    }

    /// Check the platform tag and, in strict mode, the credentials the
    /// selected platform needs. Lenient mode lets the CLI print setup
    /// guidance instead of failing outright.
    pub fn validate(&self, strict: bool) -> Result<()> {
        let platform = self.model.platform.to_lowercase();
        if !KNOWN_PLATFORMS.contains(&platform.as_str()) {
            bail!(
                "Invalid model platform: {platform}. Must be one of: deepseek, togetherai, lightningai."
            );
        }

        match platform.as_str() {
            "deepseek" => {
                if !matches!(self.model.model_type.as_str(), "coder-v3" | "v3-base" | "r1") {
                    bail!(
                        "Invalid DeepSeek model type: {}. Must be 'coder-v3', 'v3-base' or 'r1'.",
                        self.model.model_type
                    );
                }
                if strict && self.model.use_lightning {
                    if self.model.lightning_endpoint_url.is_none() {
                        bail!(
                            "Missing Lightning AI endpoint URL when use_lightning is set. \
                             Provide it via the config file or LIGHTNING_ENDPOINT_URL."
                        );
                    }
                    if self.model.lightning_api_key.is_none() {
                        bail!(
                            "Missing Lightning AI API key when use_lightning is set. \
                             Provide it via the config file or LIGHTNING_API_KEY."
                        );
                    }
                } else if strict && self.model.deepseek_api_key.is_none() {
                    bail!(
                        "Missing DeepSeek API key. Provide it via the config file or DEEPSEEK_API_KEY."
                    );
                }
            }
            "togetherai" => {
                if strict && self.model.together_api_key.is_none() {
                    bail!(
                        "Missing Together.ai API key. Provide it via the config file or TOGETHER_API_KEY."
                    );
                }
            }
            "lightningai" => {
                if strict {
                    if self.model.lightning_endpoint_url.is_none() {
                        bail!(
                            "Missing Lightning AI endpoint URL. Provide it via the config file or LIGHTNING_ENDPOINT_URL."
                        );
                    }
                    if self.model.lightning_api_key.is_none() {
                        bail!(
                            "Missing Lightning AI API key. Provide it via the config file or LIGHTNING_API_KEY."
                        );
                    }
                }
            }
            _ => unreachable!("platform already checked against KNOWN_PLATFORMS"),
        }

        Ok(())
    }
}

fn find_config_file(project_root: &Path) -> Option<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dirs) = ProjectDirs::from("com", "deepcoder", "deepcoder") {
        candidates.push(dirs.config_dir().join("config.yaml"));
    }
    candidates.push(project_root.join(".deepcoder.yaml"));

    candidates.into_iter().find(|path| path.exists())
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}
