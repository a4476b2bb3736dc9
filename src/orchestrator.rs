// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Batch orchestration over the generation endpoints
//!
//! Images run in fixed-size chunks. Within a chunk everything is
//! concurrent; chunks themselves run strictly in sequence, and
//! cancellation is only observed between them, so an in-flight chunk
//! always drains to a terminal state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use futures::future::join_all;

use crate::api::save_bulk_alt::{BulkSaveOutcome, BulkUpdate};
use crate::client::{ClientError, GenerationApi};
use crate::config::SaveMode;
use crate::store::ImageRecord;
use crate::suggestion::{SuggestionStatus, SuggestionStore};

/// Per-image generation deadline
const GENERATE_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    /// Emitted after each chunk drains; `current` counts dispatched images
    Progress { current: usize, total: usize },
    /// One image reached a terminal state for this run
    ImageFinished {
        id: String,
        status: SuggestionStatus,
    },
    Finished {
        cancelled: bool,
    },
}

pub struct BatchOrchestrator {
    api: Arc<dyn GenerationApi>,
    store: SuggestionStore,
    batch_size: usize,
    save_mode: SaveMode,
    generate_timeout: Duration,
    cancel: CancellationToken,
    events: mpsc::UnboundedSender<BatchEvent>,
}

impl BatchOrchestrator {
    pub fn new(
        api: Arc<dyn GenerationApi>,
        batch_size: usize,
        save_mode: SaveMode,
    ) -> (Self, mpsc::UnboundedReceiver<BatchEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (
            Self {
                api,
                store: SuggestionStore::new(),
                batch_size: batch_size.max(1),
                save_mode,
                generate_timeout: GENERATE_TIMEOUT,
                cancel: CancellationToken::new(),
                events,
            },
            receiver,
        )
    }

    #[cfg(test)]
    fn with_generate_timeout(mut self, timeout: Duration) -> Self {
        self.generate_timeout = timeout;
        self
    }

    pub fn store(&self) -> SuggestionStore {
        self.store.clone()
    }

    /// Token a UI holds to stop the run between chunks
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run one batch over the candidate set. Always emits a terminal
    /// `Finished` event, cancelled or not.
    pub async fn run(&self, images: &[ImageRecord]) {
        let total = images.len();
        self.store.seed(images);
        info!(total, batch_size = self.batch_size, "batch run started");

        let mut dispatched = 0;
        let mut cancelled = false;
        for chunk in images.chunks(self.batch_size) {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            join_all(chunk.iter().map(|image| self.generate_one(image))).await;
            dispatched += chunk.len();
            let _ = self.events.send(BatchEvent::Progress {
                current: dispatched.min(total),
                total,
            });
        }

        info!(
            ready = self.store.count_with_status(SuggestionStatus::Ready),
            errors = self.store.count_with_status(SuggestionStatus::Error),
            cancelled,
            "batch run finished"
        );
        let _ = self.events.send(BatchEvent::Finished { cancelled });
    }

    async fn generate_one(&self, image: &ImageRecord) {
        if !self.store.mark_generating(&image.id) {
            debug!(id = image.id, "skipping image not eligible for generation");
            return;
        }

        match tokio::time::timeout(self.generate_timeout, self.api.generate(image)).await {
            Ok(Ok(alt)) => {
                self.store.mark_ready(&image.id, &alt);
                if self.save_mode == SaveMode::AutoSave {
                    match self.api.save(&image.id, &alt).await {
                        Ok(()) => self.store.mark_saved(&[image.id.clone()]),
                        Err(e) => {
                            // suggestion stays ready; a later bulk save can retry
                            warn!(id = image.id, error = %e, "auto-save failed");
                        }
                    }
                }
            }
            Ok(Err(e)) => {
                self.store.mark_error(&image.id, &format!("Error: {}", e));
            }
            Err(_) => {
                self.store.mark_error(&image.id, "Error: Request timed out");
            }
        }

        if let Some(suggestion) = self.store.get(&image.id) {
            let _ = self.events.send(BatchEvent::ImageFinished {
                id: image.id.clone(),
                status: suggestion.status,
            });
        }
    }

    /// Persist every ready suggestion in one bulk call. Only ids the
    /// backend reports as succeeded transition to saved.
    pub async fn save_all(&self) -> Result<BulkSaveOutcome, ClientError> {
        let ready = self.store.ready_suggestions();
        if ready.is_empty() {
            return Ok(BulkSaveOutcome::default());
        }
        let updates: Vec<BulkUpdate> = ready
            .iter()
            .map(|s| BulkUpdate {
                id: s.id.clone(),
                alt: s.suggested_alt.clone(),
            })
            .collect();

        let outcome = self.api.save_bulk(&updates).await?;
        self.store.mark_saved(&outcome.success);
        info!(
            saved = outcome.success.len(),
            failed = outcome.failed.len(),
            "bulk save applied"
        );
        Ok(outcome)
    }

    /// Persist a manual edit. Returns false without touching the backend
    /// when the value did not actually change.
    pub async fn commit_edit(&self, id: &str, alt: &str) -> Result<bool, ClientError> {
        let Some(current) = self.store.get(id) else {
            return Ok(false);
        };
        if current.suggested_alt == alt {
            return Ok(false);
        }

        self.api.save(id, alt).await?;
        if !self.store.record_saved_value(id, alt) {
            self.store.update_text(id, alt);
        }
        Ok(true)
    }
}
