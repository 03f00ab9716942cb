//! # VoiceChain Progress
//!
//! Durable, per-device persistence of the guided workflow's progress record.
//!
//! ## Features
//!
//! - Single well-known key holding `{currentStep, highestStepReached, selectedCases}`
//! - Corrupt or missing entries load as the default record
//! - Best-effort saves that never fail the caller
//! - Pluggable storage backends (memory, file)

pub mod backend;
pub mod error;
pub mod record;
pub mod store;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use error::ProgressError;
pub use record::ProgressRecord;
pub use store::{ProgressStore, SaveOutcome};
