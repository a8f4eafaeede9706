//! Model backend SDK for the DeepCoder CLI
//!
//! Provides the [`ModelBackend`] trait the agent generates text through,
//! chat-completion implementations for the DeepSeek, Together.ai and
//! Lightning.ai platforms, and a [`create_backend`] factory that picks the
//! implementation from [`ModelSettings`].
//!
//! Transport failures surface as [`ModelError`]; failures the provider
//! reports in-band (non-2xx responses) come back as a [`ModelResponse`]
//! with its error flag set. Callers treat both as terminal for the request
//! at hand - the SDK performs no retries.

mod backend;
mod chat;
mod deepseek;
mod error;
mod factory;
mod lightning;
mod settings;
mod together;

pub use backend::{ModelBackend, ModelInfo, ModelResponse};
pub use deepseek::DeepSeekBackend;
pub use error::ModelError;
pub use factory::create_backend;
pub use lightning::LightningBackend;
pub use settings::{ModelParameters, ModelSettings};
pub use together::TogetherBackend;

// Re-export async trait for convenience
pub use async_trait::async_trait;
