// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod options;
pub mod provider;

pub use options::{PluginOptions, SaveMode, DEFAULT_PROMPT};
pub use provider::{ConfigError, ProviderConfig};
