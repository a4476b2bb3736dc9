// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};

/// Per-item result of a bulk save; ids land in exactly one list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSaveOutcome {
    pub success: Vec<String>,
    pub failed: Vec<String>,
}
