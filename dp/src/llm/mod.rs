//! Generation provider clients
//!
//! One trait, [`LlmClient`], with a Gemini and an OpenAI-compatible
//! implementation chosen from config.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod gemini;
mod openai;
mod retry;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use gemini::GeminiClient;
pub use openai::OpenAIClient;
pub use types::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};

use crate::config::{LlmConfig, Provider};

/// Create a client for the provider named in config
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model(), "create_client: called");
    match config.provider {
        Provider::Gemini => Ok(Arc::new(GeminiClient::from_config(config)?)),
        Provider::OpenAi => Ok(Arc::new(OpenAIClient::from_config(config)?)),
    }
}
