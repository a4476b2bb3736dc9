// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-image suggestion lifecycle
//!
//! One suggestion per image identifier per orchestration run, kept in a
//! shared map. Every mutation is a single read-modify-write under the lock
//! so concurrent completions landing together cannot lose updates.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::ImageRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    Pending,
    Generating,
    Ready,
    Saved,
    Error,
}

#[derive(Debug, Clone)]
pub struct Suggestion {
    pub id: String,
    pub filename: String,
    pub image_url: String,
    pub suggested_alt: String,
    pub status: SuggestionStatus,
    pub error: Option<String>,
    /// Last value the store successfully persisted for this image
    pub saved_alt: Option<String>,
}

/// Shared map of suggestions for one orchestration run
#[derive(Clone)]
pub struct SuggestionStore {
    inner: Arc<RwLock<HashMap<String, Suggestion>>>,
}

impl SuggestionStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create pending suggestions for the candidate set. Replaces any
    /// previous run's state.
    pub fn seed(&self, images: &[ImageRecord]) {
        let mut map = self.inner.write().unwrap();
        map.clear();
        for image in images {
            map.insert(
                image.id.clone(),
                Suggestion {
                    id: image.id.clone(),
                    filename: image.filename.clone(),
                    image_url: image.url.clone(),
                    suggested_alt: String::new(),
                    status: SuggestionStatus::Pending,
                    error: None,
                    saved_alt: None,
                },
            );
        }
    }

    /// pending/ready/error → generating, clearing prior text and error.
    /// Returns false (and changes nothing) for any other current status.
    pub fn mark_generating(&self, id: &str) -> bool {
        self.transition(id, |s| match s.status {
            SuggestionStatus::Pending | SuggestionStatus::Ready | SuggestionStatus::Error => {
                s.status = SuggestionStatus::Generating;
                s.suggested_alt.clear();
                s.error = None;
                true
            }
            _ => false,
        })
    }

    /// generating → ready with the generated text
    pub fn mark_ready(&self, id: &str, alt: &str) -> bool {
        self.transition(id, |s| match s.status {
            SuggestionStatus::Generating => {
                s.status = SuggestionStatus::Ready;
                s.suggested_alt = alt.to_string();
                s.error = None;
                true
            }
            _ => false,
        })
    }

    /// generating → error with a message
    pub fn mark_error(&self, id: &str, message: &str) -> bool {
        self.transition(id, |s| match s.status {
            SuggestionStatus::Generating => {
                s.status = SuggestionStatus::Error;
                s.suggested_alt.clear();
                s.error = Some(message.to_string());
                true
            }
            _ => false,
        })
    }

    /// ready → saved for exactly the given ids, recording the persisted text
    pub fn mark_saved(&self, ids: &[String]) {
        let mut map = self.inner.write().unwrap();
        for id in ids {
            if let Some(s) = map.get_mut(id) {
                if s.status == SuggestionStatus::Ready {
                    s.status = SuggestionStatus::Saved;
                    s.saved_alt = Some(s.suggested_alt.clone());
                }
            }
        }
    }

    /// Mutate the text without touching status (manual edit in progress)
    pub fn update_text(&self, id: &str, alt: &str) -> bool {
        self.transition(id, |s| {
            s.suggested_alt = alt.to_string();
            true
        })
    }

    /// Record a single persisted value (manual save path); ready or saved
    /// suggestions transition to saved.
    pub fn record_saved_value(&self, id: &str, alt: &str) -> bool {
        self.transition(id, |s| match s.status {
            SuggestionStatus::Ready | SuggestionStatus::Saved => {
                s.status = SuggestionStatus::Saved;
                s.suggested_alt = alt.to_string();
                s.saved_alt = Some(alt.to_string());
                true
            }
            _ => false,
        })
    }

    pub fn get(&self, id: &str) -> Option<Suggestion> {
        self.inner.read().unwrap().get(id).cloned()
    }

    pub fn snapshot(&self) -> Vec<Suggestion> {
        self.inner.read().unwrap().values().cloned().collect()
    }

    /// Suggestions eligible for bulk save: ready with non-empty text
    pub fn ready_suggestions(&self) -> Vec<Suggestion> {
        self.inner
            .read()
            .unwrap()
            .values()
            .filter(|s| s.status == SuggestionStatus::Ready && !s.suggested_alt.is_empty())
            .cloned()
            .collect()
    }

    pub fn count_with_status(&self, status: SuggestionStatus) -> usize {
        self.inner
            .read()
            .unwrap()
            .values()
            .filter(|s| s.status == status)
            .count()
    }

    fn transition<F>(&self, id: &str, f: F) -> bool
    where
        F: FnOnce(&mut Suggestion) -> bool,
    {
        let mut map = self.inner.write().unwrap();
        match map.get_mut(id) {
            Some(s) => {
                let applied = f(s);
                if !applied {
                    debug!(id, status = ?s.status, "suggestion transition rejected");
                }
                applied
            }
            None => false,
        }
    }
}

impl Default for SuggestionStore {
    fn default() -> Self {
        Self::new()
    }
}
