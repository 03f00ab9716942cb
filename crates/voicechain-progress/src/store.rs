//! Progress store: load/save semantics over a storage backend.

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use voicechain_config::StorageConfig;

use crate::backend::{FileBackend, MemoryBackend, StorageBackend};
use crate::error::ProgressError;
use crate::record::ProgressRecord;

/// Result of a best-effort save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The record reached the backend.
    Persisted,
    /// The write failed; the caller keeps running in memory.
    NotPersisted,
}

impl SaveOutcome {
    pub fn is_persisted(self) -> bool {
        matches!(self, SaveOutcome::Persisted)
    }
}

/// Durable record of workflow progress under a single well-known key.
///
/// `load` and `save` never fail: unreadable entries load as
/// [`ProgressRecord::default`] and failed writes are reported as
/// [`SaveOutcome::NotPersisted`]. Concurrent writers race with
/// last-writer-wins semantics.
#[derive(Clone)]
pub struct ProgressStore {
    backend: Arc<dyn StorageBackend>,
    key: String,
    max_step: Option<u32>,
    retention: Option<Duration>,
}

impl ProgressStore {
    /// Create a store over `backend` using `key`.
    pub fn new(backend: Arc<dyn StorageBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            max_step: None,
            retention: None,
        }
    }

    /// In-memory store, mostly for tests.
    pub fn in_memory(key: impl Into<String>) -> Self {
        Self::new(Arc::new(MemoryBackend::new()), key)
    }

    /// Build a store from the `[storage]` config section.
    pub async fn from_config(config: &StorageConfig) -> Result<Self, ProgressError> {
        let backend: Arc<dyn StorageBackend> = match config.backend.as_str() {
            "file" => Arc::new(FileBackend::new(config.resolved_path()).await?),
            "memory" => Arc::new(MemoryBackend::new()),
            other => return Err(ProgressError::UnknownBackend(other.to_string())),
        };

        let store = Self::new(backend, config.key.clone());
        Ok(match config.retention_days {
            0 => store,
            days => store.with_retention(Duration::days(i64::from(days))),
        })
    }

    /// Reject stored records whose steps exceed `max_step`.
    pub fn with_max_step(mut self, max_step: u32) -> Self {
        self.max_step = Some(max_step);
        self
    }

    /// Discard records whose `updatedAt` is older than `retention`.
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = Some(retention);
        self
    }

    /// The key this store reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the record, falling back to the default on any problem.
    pub async fn load(&self) -> ProgressRecord {
        match self.try_load().await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!("No progress entry under '{}', starting fresh", self.key);
                ProgressRecord::default()
            }
            Err(e) => {
                warn!("Discarding progress entry '{}': {}", self.key, e);
                ProgressRecord::default()
            }
        }
    }

    async fn try_load(&self) -> Result<Option<ProgressRecord>, ProgressError> {
        let Some(raw) = self.backend.get(&self.key).await? else {
            return Ok(None);
        };

        let record = ProgressRecord::decode(&raw, self.max_step)?;

        if self.is_expired(&record) {
            info!(
                "Progress entry '{}' is past retention, removing it",
                self.key
            );
            if let Err(e) = self.backend.remove(&self.key).await {
                warn!("Failed to remove expired progress entry '{}': {}", self.key, e);
            }
            return Ok(None);
        }

        Ok(Some(record))
    }

    fn is_expired(&self, record: &ProgressRecord) -> bool {
        match (self.retention, record.updated_at) {
            (Some(retention), Some(updated_at)) => Utc::now() - updated_at > retention,
            _ => false,
        }
    }

    /// Overwrite the stored record. Failures are logged and swallowed.
    pub async fn save(&self, record: &ProgressRecord) -> SaveOutcome {
        let mut stamped = record.clone();
        stamped.updated_at = Some(Utc::now());

        let result = match stamped.encode() {
            Ok(raw) => self.backend.set(&self.key, &raw).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                debug!(
                    "Saved progress '{}': step {}/{} with {} selected",
                    self.key,
                    record.current_step,
                    record.highest_step_reached,
                    record.selected_cases.len()
                );
                SaveOutcome::Persisted
            }
            Err(e) => {
                warn!("Progress not persisted under '{}': {}", self.key, e);
                SaveOutcome::NotPersisted
            }
        }
    }

    /// Remove the stored record.
    pub async fn clear(&self) -> Result<(), ProgressError> {
        self.backend.remove(&self.key).await?;
        info!("Cleared progress entry '{}'", self.key);
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
