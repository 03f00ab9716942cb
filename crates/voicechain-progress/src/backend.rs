//! Key-value storage backends.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

use crate::error::ProgressError;

/// Key-value storage for serialized progress entries.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Read the raw entry stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, ProgressError>;

    /// Overwrite the entry stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), ProgressError>;

    /// Remove the entry stored under `key`. Missing entries are not an error.
    async fn remove(&self, key: &str) -> Result<(), ProgressError>;
}

/// In-memory backend.
///
/// An optional byte quota mimics the storage limits of a browser profile.
pub struct MemoryBackend {
    entries: tokio::sync::RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryBackend {
    /// Create an empty backend without a quota.
    pub fn new() -> Self {
        Self {
            entries: tokio::sync::RwLock::new(HashMap::new()),
            quota: None,
        }
    }

    /// Create an empty backend that rejects values over `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: tokio::sync::RwLock::new(HashMap::new()),
            quota: Some(quota),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, ProgressError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ProgressError> {
        if let Some(quota) = self.quota {
            if value.len() > quota {
                return Err(ProgressError::QuotaExceeded {
                    size: value.len(),
                    quota,
                });
            }
        }
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), ProgressError> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }
}

/// File system backend.
///
/// Each key is one JSON file:
/// ```text
/// {storage_path}/
/// └── {key}.json
/// ```
pub struct FileBackend {
    storage_path: PathBuf,
}

impl FileBackend {
    /// Create a file backend rooted at `storage_path`, creating the directory.
    pub async fn new(storage_path: impl Into<PathBuf>) -> Result<Self, ProgressError> {
        let storage_path = storage_path.into();
        fs::create_dir_all(&storage_path).await?;

        debug!("FileBackend initialized at {:?}", storage_path);

        Ok(Self { storage_path })
    }

    /// Directory holding the entries.
    pub fn storage_path(&self) -> &PathBuf {
        &self.storage_path
    }

    /// File path for a key.
    fn entry_path(&self, key: &str) -> PathBuf {
        self.storage_path.join(format!("{}.json", Self::encode_key(key)))
    }

    /// Encode a key as a file name. ASCII alphanumerics, `-` and `_` pass
    /// through; every other byte becomes `%XX`, so distinct keys never share
    /// a file.
    fn encode_key(key: &str) -> String {
        let mut out = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
                out.push(byte as char);
            } else {
                out.push_str(&format!("%{:02X}", byte));
            }
        }
        out
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, ProgressError> {
        let path = self.entry_path(key);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ProgressError::StorageRead(format!("{:?}: {}", path, e))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ProgressError> {
        let path = self.entry_path(key);
        // Replace atomically through a sibling temp file.
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, value)
            .await
            .map_err(|e| ProgressError::StorageWrite(format!("{:?}: {}", tmp, e)))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| ProgressError::StorageWrite(format!("{:?}: {}", path, e)))?;

        debug!("Wrote progress entry '{}' to {:?}", key, path);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), ProgressError> {
        let path = self.entry_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed progress entry '{}'", key);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ProgressError::Io(e)),
        }
    }
}
