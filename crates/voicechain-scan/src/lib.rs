//! # VoiceChain Scan
//!
//! Simulated voice-sample scan for the VoiceChain workflow.
//!
//! ## Features
//!
//! - Scoped one-shot and repeating timers with group cancellation
//! - Seeded, reproducible progress counters and stage announcements
//! - Permission-gated, exclusive capture device sessions

pub mod capture;
pub mod error;
pub mod scan;
pub mod timer;

pub use capture::{acquire, CaptureDevice, CaptureSession, Permission, SimulatedMicrophone};
pub use error::{ScanError, ScanResult};
pub use scan::{Counter, ScanEvent, ScanHandle, ScanSimulation, ScanSnapshot, ScanStage};
pub use timer::{Timer, TimerControl, TimerGroup};
