//! Backend construction from settings

use crate::backend::ModelBackend;
use crate::deepseek::DeepSeekBackend;
use crate::error::ModelError;
use crate::lightning::LightningBackend;
use crate::settings::ModelSettings;
use crate::together::TogetherBackend;

/// Create the backend the settings select.
pub fn create_backend(settings: &ModelSettings) -> Result<Box<dyn ModelBackend>, ModelError> {
    match settings.platform.to_lowercase().as_str() {
        "deepseek" => Ok(Box::new(DeepSeekBackend::new(settings)?)),
        "togetherai" => Ok(Box::new(TogetherBackend::new(settings)?)),
        "lightningai" => Ok(Box::new(LightningBackend::new(settings)?)),
        other => Err(ModelError::UnsupportedPlatform(other.to_string())),
    }
}
