//! Scan error types.

use thiserror::Error;

/// Scan and capture error types.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Scan settings that cannot drive the timers.
    #[error("Invalid scan config: {0}")]
    InvalidConfig(String),

    /// The user refused access to the capture device.
    #[error("Permission denied for {0}")]
    PermissionDenied(String),

    /// The capture device is held by another session.
    #[error("Device busy: {0}")]
    DeviceBusy(String),

    /// No capture device is present.
    #[error("Device unavailable: {0}")]
    DeviceUnavailable(String),
}

/// Result type for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;
