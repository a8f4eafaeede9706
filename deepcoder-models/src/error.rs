//! Error types for the model SDK

use thiserror::Error;

/// Errors raised while configuring or calling a model backend
#[derive(Debug, Error)]
pub enum ModelError {
    /// The platform tag does not name a backend this SDK implements
    #[error("unsupported model platform: {0}")]
    UnsupportedPlatform(String),

    /// A credential or endpoint the selected backend needs is absent
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),

    /// The HTTP request could not be completed
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}
