// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision backend abstraction
//!
//! One uniform contract over the three supported AI vision APIs. Adapters
//! own their retry/backoff behavior; callers never re-truncate the result.

pub mod anthropic;
pub mod google;
pub mod openai;
pub mod retry;

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use crate::config::ProviderConfig;

pub use anthropic::AnthropicProvider;
pub use google::GoogleProvider;
pub use openai::OpenAiProvider;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} rate limit exceeded")]
    RateLimited { provider: &'static str },

    #[error("Missing API key for {provider} (set {env_var})")]
    MissingApiKey {
        provider: &'static str,
        env_var: &'static str,
    },

    #[error("{provider} API error ({status}): {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("{provider} request failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned no text content")]
    EmptyResponse { provider: &'static str },
}

/// Base64-encoded image ready for a vision API
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub data: String,
    pub media_type: String,
}

impl ImageInput {
    pub fn from_bytes(bytes: &[u8], media_type: &str) -> Self {
        Self {
            data: STANDARD.encode(bytes),
            media_type: media_type.to_string(),
        }
    }

    /// Data URL form used by OpenAI-style APIs
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// Uniform contract over the vision backends
#[async_trait]
pub trait VisionProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Generate alt text for an image. The result is trimmed and truncated
    /// to `max_length` characters before being returned; this is the only
    /// place length is enforced.
    async fn generate_alt_text(
        &self,
        image: &ImageInput,
        prompt: &str,
        max_length: usize,
    ) -> Result<String, ProviderError>;
}

/// Select the adapter for a resolved provider configuration
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn VisionProvider>, ProviderError> {
    match config {
        ProviderConfig::Anthropic { api_key, model } => Ok(Arc::new(AnthropicProvider::new(
            api_key.clone(),
            model.clone(),
        )?)),
        ProviderConfig::Openai { api_key, model } => Ok(Arc::new(OpenAiProvider::new(
            api_key.clone(),
            model.clone(),
        )?)),
        ProviderConfig::Google { api_key, model } => Ok(Arc::new(GoogleProvider::new(
            api_key.clone(),
            model.clone(),
        )?)),
    }
}

/// Trim and cap generated text at `max_length` characters
pub(crate) fn finalize_alt(text: &str, max_length: usize) -> String {
    text.trim().chars().take(max_length).collect()
}
