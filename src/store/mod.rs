// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Document store seam
//!
//! The core never talks to a database directly; hosts adapt their store
//! behind this trait. `MemoryStore` is the in-memory implementation used
//! by tests and local fixtures.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document '{0}' not found")]
    NotFound(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Immutable snapshot of an image record, as the document store returns it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    pub filename: String,
    pub url: String,
    pub alt: Option<String>,
}

/// Find/update operations the core needs from the host's document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Records whose alt field is empty, null or absent, up to `limit`.
    /// Extension filtering is the caller's concern.
    async fn find_missing_alt(
        &self,
        collection: &str,
        alt_field: &str,
        limit: usize,
    ) -> Result<Vec<ImageRecord>, StoreError>;

    /// Set the alt field of one record
    async fn update_alt(
        &self,
        collection: &str,
        id: &str,
        alt_field: &str,
        value: &str,
    ) -> Result<(), StoreError>;
}

/// In-memory document store with per-id failure injection
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Vec<ImageRecord>>>>,
    failing_ids: Arc<RwLock<HashSet<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
            failing_ids: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    pub async fn insert(&self, collection: &str, record: ImageRecord) {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(record);
    }

    /// Make `update_alt` fail for this id
    pub async fn fail_updates_for(&self, id: &str) {
        self.failing_ids.write().await.insert(id.to_string());
    }

    pub async fn get(&self, collection: &str, id: &str) -> Option<ImageRecord> {
        self.collections
            .read()
            .await
            .get(collection)?
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_missing_alt(
        &self,
        collection: &str,
        _alt_field: &str,
        limit: usize,
    ) -> Result<Vec<ImageRecord>, StoreError> {
        let collections = self.collections.read().await;
        let records = collections.get(collection).cloned().unwrap_or_default();
        Ok(records
            .into_iter()
            .filter(|r| r.alt.as_deref().unwrap_or("").is_empty())
            .take(limit)
            .collect())
    }

    async fn update_alt(
        &self,
        collection: &str,
        id: &str,
        _alt_field: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        if self.failing_ids.read().await.contains(id) {
            return Err(StoreError::Backend(format!("injected failure for {}", id)));
        }
        let mut collections = self.collections.write().await;
        let records = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::NotFound(collection.to_string()))?;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.alt = Some(value.to_string());
        Ok(())
    }
}
