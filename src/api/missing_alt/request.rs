// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingAltQuery {
    /// When "true", return only the count
    #[serde(default)]
    pub count_only: Option<String>,
}

impl MissingAltQuery {
    pub fn count_only(&self) -> bool {
        self.count_only.as_deref() == Some("true")
    }
}
