// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Route table for the collection-scoped endpoints

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::generate_alt::generate_alt_handler;
use crate::api::missing_alt::missing_alt_handler;
use crate::api::save_alt::save_alt_handler;
use crate::api::save_bulk_alt::save_bulk_alt_handler;
use crate::api::state::AppState;

/// All four endpoints, mounted under `/:collection`
pub fn collection_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/:collection/missing-alt", get(missing_alt_handler))
        .route("/:collection/generate-alt", post(generate_alt_handler))
        .route("/:collection/save-alt", post(save_alt_handler))
        .route("/:collection/save-bulk-alt", post(save_bulk_alt_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
