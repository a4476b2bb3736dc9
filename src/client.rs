// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client side of the collection endpoints
//!
//! The batch orchestrator drives generation through this trait so tests
//! can substitute a scripted backend for the HTTP surface.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::api::generate_alt::{GenerateAltRequest, GenerateAltResponse};
use crate::api::save_alt::{SaveAltRequest, SaveAltResponse};
use crate::api::save_bulk_alt::{BulkSaveOutcome, BulkUpdate, SaveBulkAltRequest};
use crate::api::ErrorResponse;
use crate::store::ImageRecord;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Api(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Generation and persistence operations the orchestrator needs
#[async_trait]
pub trait GenerationApi: Send + Sync {
    /// Produce a suggestion for one image
    async fn generate(&self, image: &ImageRecord) -> Result<String, ClientError>;

    /// Persist one alt text
    async fn save(&self, id: &str, alt: &str) -> Result<(), ClientError>;

    /// Persist many alt texts; per-item outcomes, never all-or-nothing
    async fn save_bulk(&self, updates: &[BulkUpdate]) -> Result<BulkSaveOutcome, ClientError>;
}

/// `GenerationApi` over HTTP, against one collection's endpoints
pub struct HttpGenerationClient {
    client: reqwest::Client,
    base_url: String,
    collection: String,
    auth_token: Option<String>,
}

impl HttpGenerationClient {
    /// `base_url` is the mount point of the routes, e.g.
    /// `http://localhost:3000/api`.
    pub fn new(
        base_url: impl Into<String>,
        collection: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            collection: collection.into(),
            auth_token: None,
        })
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    fn endpoint(&self, name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.collection,
            name
        )
    }

    async fn post_json<Req, Resp>(&self, name: &str, body: &Req) -> Result<Resp, ClientError>
    where
        Req: serde::Serialize + Sync,
        Resp: serde::de::DeserializeOwned,
    {
        let mut request = self.client.post(self.endpoint(name)).json(body);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.details.unwrap_or(body.error),
                Err(_) => format!("HTTP {}", status.as_u16()),
            };
            debug!(endpoint = name, status = status.as_u16(), "request rejected");
            return Err(ClientError::Api(message));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl GenerationApi for HttpGenerationClient {
    async fn generate(&self, image: &ImageRecord) -> Result<String, ClientError> {
        let request = GenerateAltRequest {
            image_id: Some(image.id.clone()),
            image_url: Some(image.url.clone()),
            filename: Some(image.filename.clone()),
        };
        let response: GenerateAltResponse = self.post_json("generate-alt", &request).await?;
        Ok(response.suggested_alt)
    }

    async fn save(&self, id: &str, alt: &str) -> Result<(), ClientError> {
        let request = SaveAltRequest {
            image_id: Some(id.to_string()),
            alt_text: Some(alt.to_string()),
            collection_slug: None,
        };
        let _: SaveAltResponse = self.post_json("save-alt", &request).await?;
        Ok(())
    }

    async fn save_bulk(&self, updates: &[BulkUpdate]) -> Result<BulkSaveOutcome, ClientError> {
        let request = SaveBulkAltRequest {
            updates: Some(updates.to_vec()),
            collection_slug: None,
        };
        self.post_json("save-bulk-alt", &request).await
    }
}
