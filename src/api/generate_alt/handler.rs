// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use tracing::info;

use crate::api::errors::ApiError;
use crate::api::generate_alt::request::GenerateAltRequest;
use crate::api::generate_alt::response::GenerateAltResponse;
use crate::api::state::AppState;
use crate::classify::{derive_alt_from_filename, extension_of, extension_of_url_path, IMAGE_EXTENSIONS};
use crate::fetch::RequestContext;
use crate::normalize::normalize;
use crate::providers::ImageInput;

/// POST /:collection/generate-alt — produce one alt-text suggestion.
///
/// SVGs never reach the vision backend: their alt is derived from the
/// filename alone. Everything else is fetched, normalized and described.
pub async fn generate_alt_handler(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    Json(request): Json<GenerateAltRequest>,
) -> Result<Json<GenerateAltResponse>, ApiError> {
    state
        .auth
        .verify(&headers)
        .ok_or(ApiError::Unauthorized)?;

    let image_url = request
        .image_url
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or(ApiError::MissingImageUrl)?;
    let id = request.image_id.clone().unwrap_or_default();
    let filename = request.filename.clone().unwrap_or_default();

    // Extension from the filename, falling back to the URL path
    let extension = extension_of(&filename)
        .or_else(|| extension_of_url_path(image_url))
        .unwrap_or_default();
    if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ApiError::UnsupportedType { extension });
    }

    if extension == "svg" {
        let source = if filename.is_empty() { image_url } else { &filename };
        let suggested_alt = derive_alt_from_filename(source);
        info!(collection, id, "derived alt for svg from filename");
        return Ok(Json(GenerateAltResponse {
            id,
            filename,
            suggested_alt,
            image_url: image_url.to_string(),
        }));
    }

    let ctx = RequestContext::from_headers(&headers);
    let fetched = state
        .fetcher
        .fetch(image_url, &filename, &collection, &ctx)
        .await?;
    let normalized = normalize(fetched.bytes, &fetched.content_type)?;

    let prompt = state.options.build_prompt(&filename);
    let input = ImageInput::from_bytes(&normalized.bytes, &normalized.media_type);
    let suggested_alt = state
        .provider
        .generate_alt_text(&input, &prompt, state.options.max_length)
        .await?;

    info!(
        collection,
        id,
        provider = state.provider.name(),
        resized = normalized.was_resized,
        "generated alt text"
    );
    Ok(Json(GenerateAltResponse {
        id,
        filename,
        suggested_alt,
        image_url: image_url.to_string(),
    }))
}
