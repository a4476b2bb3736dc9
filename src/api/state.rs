// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared handler state, assembled once at startup

use std::sync::Arc;

use thiserror::Error;

use crate::api::auth::SessionVerifier;
use crate::config::{ConfigError, PluginOptions};
use crate::fetch::{FetchError, ImageFetcher};
use crate::providers::{create_provider, ProviderError, VisionProvider};
use crate::store::DocumentStore;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[derive(Clone)]
pub struct AppState {
    pub options: Arc<PluginOptions>,
    pub store: Arc<dyn DocumentStore>,
    pub provider: Arc<dyn VisionProvider>,
    pub fetcher: Arc<ImageFetcher>,
    pub auth: Arc<dyn SessionVerifier>,
}

impl AppState {
    /// Resolve the vision backend from the options and build the fetcher.
    /// Fails fast on a misconfigured backend instead of at first request.
    pub fn new(
        options: PluginOptions,
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn SessionVerifier>,
    ) -> Result<Self, SetupError> {
        let provider_config = options.effective_provider()?;
        let provider = create_provider(&provider_config)?;
        let fetcher = ImageFetcher::new(options.storage_dirs.clone())?;
        Ok(Self {
            options: Arc::new(options),
            store,
            provider,
            fetcher: Arc::new(fetcher),
            auth,
        })
    }

    /// Swap the vision backend, keeping everything else
    pub fn with_provider(mut self, provider: Arc<dyn VisionProvider>) -> Self {
        self.provider = provider;
        self
    }
}
