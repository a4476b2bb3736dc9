// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Google Gemini generateContent adapter

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::retry::with_rate_limit_retry;
use super::{finalize_alt, ImageInput, ProviderError, VisionProvider};

const PROVIDER: &str = "google";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const ENV_VAR: &str = "GOOGLE_GENERATIVE_AI_API_KEY";
const MAX_OUTPUT_TOKENS: u32 = 100;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

pub struct GoogleProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GoogleProvider {
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
        request: &GenerateContentRequest,
    ) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", api_key)
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
            // Gemini signals quota exhaustion in the error body as well
            if message.contains("RESOURCE_EXHAUSTED") {
                return Err(ProviderError::RateLimited { provider: PROVIDER });
            }
            return Err(ProviderError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse =
            response
                .json()
                .await
                .map_err(|source| ProviderError::Http {
                    provider: PROVIDER,
                    source,
                })?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().find_map(|p| p.text))
            .ok_or(ProviderError::EmptyResponse { provider: PROVIDER })
    }
}

#[async_trait]
impl VisionProvider for GoogleProvider {
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
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.media_type.clone(),
                            data: image.data.clone(),
                        },
                    },
                    Part::Text {
                        text: prompt.to_string(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        debug!(model = %self.model, "requesting alt text from Gemini");
        let text = with_rate_limit_retry(|| self.attempt(&api_key, &request)).await?;
        Ok(finalize_alt(&text, max_length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model() {
        let provider = GoogleProvider::new(Some("key".to_string()), None).unwrap();
        assert_eq!(provider.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_request_serialization() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/png".to_string(),
                            data: "YWJj".to_string(),
                        },
                    },
                    Part::Text {
                        text: "Describe".to_string(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inline_data"]["mime_type"], "image/png");
        assert_eq!(parts[1]["text"], "Describe");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 100);
    }

    #[test]
    fn test_response_parsing() {
        let json = serde_json::json!({
            "candidates": [{
                "content": {"parts": [{"text": "A mountain trail."}]}
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(json).unwrap();
        assert_eq!(
            response.candidates[0].content.parts[0].text.as_deref(),
            Some("A mountain trail.")
        );
    }
}
