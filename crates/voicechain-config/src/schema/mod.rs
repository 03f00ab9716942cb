//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod schema_scan;

pub use schema_scan::*;

/// Shared default helper used by submodules.
pub(crate) fn default_true() -> bool {
    true
}

/// Base directory for VoiceChain state and logs.
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".voicechain"))
        .unwrap_or_else(|| PathBuf::from("/tmp/voicechain"))
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub workflow: WorkflowConfig,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Progress persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage backend: `file` or `memory`.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Directory holding the persisted entry (file backend only).
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Well-known key of the progress entry.
    #[serde(default = "default_key")]
    pub key: String,

    /// Records untouched for longer than this are discarded on load.
    /// `0` keeps records forever.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

impl StorageConfig {
    /// Storage directory with `~` expanded, or the default state directory.
    pub fn resolved_path(&self) -> PathBuf {
        match &self.path {
            Some(p) => PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).to_string()),
            None => default_data_dir().join("state"),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: None,
            key: default_key(),
            retention_days: default_retention_days(),
        }
    }
}

fn default_backend() -> String {
    "file".to_string()
}

fn default_key() -> String {
    "voicechain_workflow_state".to_string()
}

fn default_retention_days() -> u32 {
    30
}

/// Workflow configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// JSON case catalog. The built-in demo catalog is used when unset.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    /// Also write daily-rotated log files under the data directory.
    #[serde(default = "default_true")]
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: default_true(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
