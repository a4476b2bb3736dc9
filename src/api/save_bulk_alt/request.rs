// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};

/// One id/text pair in a bulk save
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdate {
    pub id: String,
    pub alt: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBulkAltRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updates: Option<Vec<BulkUpdate>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_slug: Option<String>,
}
