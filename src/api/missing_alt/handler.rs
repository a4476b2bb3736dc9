// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::debug;

use crate::api::errors::ApiError;
use crate::api::missing_alt::request::MissingAltQuery;
use crate::api::missing_alt::response::{MissingAltCount, MissingAltResponse};
use crate::api::state::AppState;
use crate::classify::is_supported_image;

/// Upper bound on candidates returned per scan
const MISSING_ALT_LIMIT: usize = 500;

/// GET /:collection/missing-alt — images whose alt field is empty.
/// Records whose filename is not a supported image type are dropped
/// before counting, so the count always matches what a batch would run.
pub async fn missing_alt_handler(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(query): Query<MissingAltQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    state
        .auth
        .verify(&headers)
        .ok_or(ApiError::Unauthorized)?;

    let records = state
        .store
        .find_missing_alt(&collection, &state.options.alt_field_name, MISSING_ALT_LIMIT)
        .await
        .map_err(ApiError::QueryFailed)?;

    let docs: Vec<_> = records
        .into_iter()
        .filter(|r| is_supported_image(&r.filename))
        .collect();
    debug!(collection, count = docs.len(), "missing-alt scan");

    if query.count_only() {
        return Ok(Json(MissingAltCount {
            total_docs: docs.len(),
        })
        .into_response());
    }

    let total_docs = docs.len();
    Ok(Json(MissingAltResponse { docs, total_docs }).into_response())
}
