//! LLM — completion-service adapter for the chat widget.
//!
//! DESIGN
//! ======
//! Uses environment variables instead of config files. `LlmClient` pairs the
//! OpenRouter HTTP client with the configured model and is the production
//! implementation of [`LlmChat`].

pub mod config;
pub mod openrouter;
pub mod types;

use config::LlmConfig;
pub use types::LlmChat;
use types::{ChatResponse, LlmError, Message};

// =============================================================================
// CLIENT
// =============================================================================

/// Concrete LLM client bound to one model.
///
/// Configured from environment variables by [`LlmClient::from_env`].
pub struct LlmClient {
    inner: openrouter::OpenRouterClient,
    model: String,
}

impl LlmClient {
    /// Build an LLM client from environment variables. See [`LlmConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the HTTP client fails.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env()?;
        Self::from_config(config)
    }

    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let inner =
            openrouter::OpenRouterClient::new(config.api_key, config.base_url, config.http_referer, config.timeouts)?;
        Ok(Self { inner, model: config.model })
    }

    /// Return the configured model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl LlmChat for LlmClient {
    async fn chat(&self, system: &str, messages: &[Message]) -> Result<ChatResponse, LlmError> {
        self.inner.chat(&self.model, system, messages).await
    }
}
