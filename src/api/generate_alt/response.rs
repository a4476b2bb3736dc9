// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAltResponse {
    pub id: String,
    pub filename: String,
    pub suggested_alt: String,
    pub image_url: String,
}
