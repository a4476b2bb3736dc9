// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use tracing::info;

use crate::api::errors::ApiError;
use crate::api::save_alt::request::SaveAltRequest;
use crate::api::save_alt::response::SaveAltResponse;
use crate::api::state::AppState;

/// POST /:collection/save-alt — persist one alt text
pub async fn save_alt_handler(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    Json(request): Json<SaveAltRequest>,
) -> Result<Json<SaveAltResponse>, ApiError> {
    state
        .auth
        .verify(&headers)
        .ok_or(ApiError::Unauthorized)?;

    let id = request
        .image_id
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::InvalidRequest("Image ID and alt text are required".to_string()))?;
    let alt_text = request
        .alt_text
        .as_deref()
        .ok_or_else(|| ApiError::InvalidRequest("Image ID and alt text are required".to_string()))?;
    let collection = request.collection_slug.as_deref().unwrap_or(&collection);

    state
        .store
        .update_alt(collection, id, &state.options.alt_field_name, alt_text)
        .await
        .map_err(ApiError::SaveFailed)?;

    info!(collection, id, "saved alt text");
    Ok(Json(SaveAltResponse {
        success: true,
        id: id.to_string(),
    }))
}
