// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod auth;
pub mod errors;
pub mod generate_alt;
pub mod missing_alt;
pub mod router;
pub mod save_alt;
pub mod save_bulk_alt;
pub mod state;

pub use auth::{AllowAll, BearerTokenVerifier, SessionVerifier};
pub use errors::{ApiError, ErrorResponse};
pub use generate_alt::{generate_alt_handler, GenerateAltRequest, GenerateAltResponse};
pub use missing_alt::{missing_alt_handler, MissingAltCount, MissingAltResponse};
pub use router::collection_routes;
pub use save_alt::{save_alt_handler, SaveAltRequest, SaveAltResponse};
pub use save_bulk_alt::{save_bulk_alt_handler, BulkSaveOutcome, BulkUpdate, SaveBulkAltRequest};
pub use state::{AppState, SetupError};
