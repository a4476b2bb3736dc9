// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Anthropic Messages API adapter

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::retry::with_rate_limit_retry;
use super::{finalize_alt, ImageInput, ProviderError, VisionProvider};

const PROVIDER: &str = "anthropic";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
const ENV_VAR: &str = "ANTHROPIC_API_KEY";
const MAX_TOKENS: u32 = 100;

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: Vec<ContentBlock>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock {
    Image { source: ImageSource },
    Text { text: String },
}

#[derive(Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    source_type: String,
    media_type: String,
    data: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl AnthropicProvider {
    pub fn new(api_key: Option<String>, model: Option<String>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|source| ProviderError::Http {
                provider: PROVIDER,
                source,
            })?;
        Ok(Self {
            client,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn resolve_api_key(&self) -> Result<String, ProviderError> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(ENV_VAR).ok())
            .ok_or(ProviderError::MissingApiKey {
                provider: PROVIDER,
                env_var: ENV_VAR,
            })
    }

    async fn attempt(
        &self,
        api_key: &str,
        request: &MessagesRequest,
    ) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .json(request)
            .send()
            .await
            .map_err(|source| ProviderError::Http {
                provider: PROVIDER,
                source,
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(ProviderError::RateLimited { provider: PROVIDER });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessagesResponse =
            response
                .json()
                .await
                .map_err(|source| ProviderError::Http {
                    provider: PROVIDER,
                    source,
                })?;

        parsed
            .content
            .into_iter()
            .find(|c| c.content_type == "text")
            .and_then(|c| c.text)
            .ok_or(ProviderError::EmptyResponse { provider: PROVIDER })
    }
}

#[async_trait]
impl VisionProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn generate_alt_text(
        &self,
        image: &ImageInput,
        prompt: &str,
        max_length: usize,
    ) -> Result<String, ProviderError> {
        let api_key = self.resolve_api_key()?;
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user".to_string(),
                content: vec![
                    ContentBlock::Image {
                        source: ImageSource {
                            source_type: "base64".to_string(),
                            media_type: image.media_type.clone(),
                            data: image.data.clone(),
                        },
                    },
                    ContentBlock::Text {
                        text: prompt.to_string(),
                    },
                ],
            }],
        };

        debug!(model = %self.model, "requesting alt text from Anthropic");
        let text = with_rate_limit_retry(|| self.attempt(&api_key, &request)).await?;
        Ok(finalize_alt(&text, max_length))
    }
}
