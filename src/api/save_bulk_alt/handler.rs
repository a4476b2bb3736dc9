// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use futures::future::join_all;
use tracing::{info, warn};

use crate::api::errors::ApiError;
use crate::api::save_bulk_alt::request::SaveBulkAltRequest;
use crate::api::save_bulk_alt::response::BulkSaveOutcome;
use crate::api::state::AppState;

/// POST /:collection/save-bulk-alt — persist many alt texts.
///
/// Items are saved independently; one failing update never rolls back or
/// blocks the rest. The response partitions the ids by outcome.
pub async fn save_bulk_alt_handler(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    Json(request): Json<SaveBulkAltRequest>,
) -> Result<Json<BulkSaveOutcome>, ApiError> {
    state
        .auth
        .verify(&headers)
        .ok_or(ApiError::Unauthorized)?;

    let updates = request
        .updates
        .ok_or_else(|| ApiError::InvalidRequest("Updates array is required".to_string()))?;
    let collection = request
        .collection_slug
        .as_deref()
        .unwrap_or(&collection)
        .to_string();

    let alt_field = state.options.alt_field_name.clone();
    let results = join_all(updates.iter().map(|update| {
        let store = state.store.clone();
        let collection = collection.clone();
        let alt_field = alt_field.clone();
        async move {
            let result = store
                .update_alt(&collection, &update.id, &alt_field, &update.alt)
                .await;
            (update.id.clone(), result)
        }
    }))
    .await;

    let mut outcome = BulkSaveOutcome::default();
    for (id, result) in results {
        match result {
            Ok(()) => outcome.success.push(id),
            Err(e) => {
                warn!(collection, id, error = %e, "bulk save item failed");
                outcome.failed.push(id);
            }
        }
    }

    info!(
        collection,
        saved = outcome.success.len(),
        failed = outcome.failed.len(),
        "bulk save finished"
    );
    Ok(Json(outcome))
}
