// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod classify;
pub mod client;
pub mod config;
pub mod fetch;
pub mod normalize;
pub mod orchestrator;
pub mod providers;
pub mod store;
pub mod suggestion;

// Re-export the surface most hosts need
pub use api::{collection_routes, ApiError, AppState, SessionVerifier};
pub use client::{ClientError, GenerationApi, HttpGenerationClient};
pub use config::{PluginOptions, ProviderConfig, SaveMode};
pub use orchestrator::{BatchEvent, BatchOrchestrator};
pub use providers::{create_provider, VisionProvider};
pub use store::{DocumentStore, ImageRecord, MemoryStore};
pub use suggestion::{Suggestion, SuggestionStatus, SuggestionStore};
