// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image fetching: direct storage reads with an HTTP fallback

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::http::HeaderMap;
use thiserror::Error;
use tracing::debug;

use crate::classify::{content_type_for_extension, extension_of};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch image: {0}")]
    Status(u16),

    #[error("Failed to fetch image: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to read image from storage: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw image bytes plus the content type they arrived with
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Protocol/host of the incoming request, used to qualify relative URLs
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub scheme: String,
    pub host: String,
}

impl RequestContext {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let scheme = headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("http")
            .to_string();
        let host = headers
            .get("host")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("localhost:3000")
            .to_string();
        Self { scheme, host }
    }
}

/// Resolves an image reference to bytes + content type.
///
/// Collection uploads live on local disk when a storage root is configured;
/// those are read directly. Everything else (and any direct-path failure)
/// goes through an HTTP GET against the resolved absolute URL.
pub struct ImageFetcher {
    client: reqwest::Client,
    storage_dirs: HashMap<String, PathBuf>,
}

impl ImageFetcher {
    pub fn new(storage_dirs: HashMap<String, PathBuf>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            client,
            storage_dirs,
        })
    }

    pub async fn fetch(
        &self,
        image_url: &str,
        filename: &str,
        collection: &str,
        ctx: &RequestContext,
    ) -> Result<FetchedImage, FetchError> {
        if image_url.starts_with('/') {
            if let Some(root) = self.storage_dirs.get(collection) {
                match self.read_from_storage(root, filename).await {
                    Ok(image) => return Ok(image),
                    Err(e) => {
                        debug!(
                            collection,
                            filename,
                            error = %e,
                            "direct storage read failed, falling back to HTTP"
                        );
                    }
                }
            }
        }

        let full_url = if image_url.starts_with('/') {
            format!("{}://{}{}", ctx.scheme, ctx.host, image_url)
        } else {
            image_url.to_string()
        };

        let response = self.client.get(&full_url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let bytes = response.bytes().await?.to_vec();

        Ok(FetchedImage {
            bytes,
            content_type,
        })
    }

    async fn read_from_storage(
        &self,
        root: &Path,
        filename: &str,
    ) -> Result<FetchedImage, FetchError> {
        // only the file-name component; upload filenames must not traverse
        let name = filename.rsplit('/').next().unwrap_or(filename);
        let path = root.join(name);
        let bytes = tokio::fs::read(&path).await?;

        let content_type = extension_of(name)
            .and_then(|ext| content_type_for_extension(&ext))
            .unwrap_or("application/octet-stream")
            .to_string();

        debug!(path = %path.display(), size = bytes.len(), "read image from storage");
        Ok(FetchedImage {
            bytes,
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn fetcher_with_dir(collection: &str, dir: &Path) -> ImageFetcher {
        let mut dirs = HashMap::new();
        dirs.insert(collection.to_string(), dir.to_path_buf());
        ImageFetcher::new(dirs).unwrap()
    }

    fn ctx() -> RequestContext {
        RequestContext {
            scheme: "http".to_string(),
            host: "localhost:3000".to_string(),
        }
    }

    #[test]
    fn test_request_context_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        headers.insert("host", HeaderValue::from_static("cms.example.com"));
        let ctx = RequestContext::from_headers(&headers);
        assert_eq!(ctx.scheme, "https");
        assert_eq!(ctx.host, "cms.example.com");
    }

    #[test]
    fn test_request_context_defaults() {
        let ctx = RequestContext::from_headers(&HeaderMap::new());
        assert_eq!(ctx.scheme, "http");
        assert_eq!(ctx.host, "localhost:3000");
    }

    #[tokio::test]
    async fn test_direct_storage_read() {
        let dir = tempfile::tempdir().unwrap();
        let payload = vec![0x89u8, 0x50, 0x4E, 0x47];
        std::fs::write(dir.path().join("cat.png"), &payload).unwrap();

        let fetcher = fetcher_with_dir("media", dir.path());
        let image = fetcher
            .fetch("/media/cat.png", "cat.png", "media", &ctx())
            .await
            .unwrap();
        assert_eq!(image.bytes, payload);
        assert_eq!(image.content_type, "image/png");
    }

    #[tokio::test]
    async fn test_storage_read_strips_path_components() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cat.png"), b"x").unwrap();

        let fetcher = fetcher_with_dir("media", dir.path());
        let image = fetcher
            .fetch("/media/cat.png", "../../cat.png", "media", &ctx())
            .await
            .unwrap();
        assert_eq!(image.bytes, b"x");
    }

    #[tokio::test]
    async fn test_missing_file_falls_back_to_http_and_fails() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fetcher_with_dir("media", dir.path());
        // no file on disk and nothing listening on the fallback host
        let result = fetcher
            .fetch(
                "/media/nope.png",
                "nope.png",
                "media",
                &RequestContext {
                    scheme: "http".to_string(),
                    host: "127.0.0.1:59998".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(FetchError::Request(_))));
    }

    #[tokio::test]
    async fn test_unconfigured_collection_skips_direct_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cat.png"), b"x").unwrap();
        let fetcher = fetcher_with_dir("media", dir.path());
        // different collection: must not read the media storage root
        let result = fetcher
            .fetch(
                "/avatars/cat.png",
                "cat.png",
                "avatars",
                &RequestContext {
                    scheme: "http".to_string(),
                    host: "127.0.0.1:59998".to_string(),
                },
            )
            .await;
        assert!(result.is_err());
    }
}
