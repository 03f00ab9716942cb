//! Capture devices for recording a voice sample.
//!
//! Acquisition asks for permission first and claims the device exclusively.
//! The returned [`CaptureSession`] releases the device on [`CaptureSession::stop`]
//! or on drop, whichever comes first.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::{ScanError, ScanResult};

/// A device that can record audio.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Device name for messages.
    fn name(&self) -> &str;

    /// Ask the user for access. Resolves once they answer.
    async fn request_permission(&self) -> ScanResult<()>;

    /// Claim the device. Returns false when it is already held.
    fn try_claim(&self) -> bool;

    /// Give the device back.
    fn release(&self);
}

/// Request permission and claim `device` for one recording.
pub async fn acquire(device: Arc<dyn CaptureDevice>) -> ScanResult<CaptureSession> {
    device.request_permission().await?;

    if !device.try_claim() {
        return Err(ScanError::DeviceBusy(device.name().to_string()));
    }

    info!("Recording from {}", device.name());
    Ok(CaptureSession {
        device,
        released: AtomicBool::new(false),
        started: Instant::now(),
    })
}

/// Exclusive hold on a capture device.
pub struct CaptureSession {
    device: Arc<dyn CaptureDevice>,
    released: AtomicBool,
    started: Instant,
}

impl CaptureSession {
    /// Stop recording and release the device. Idempotent.
    pub fn stop(&self) -> Duration {
        let elapsed = self.started.elapsed();
        if !self.released.swap(true, Ordering::SeqCst) {
            self.device.release();
            info!(
                "Stopped recording from {} after {:?}",
                self.device.name(),
                elapsed
            );
        }
        elapsed
    }

    pub fn is_active(&self) -> bool {
        !self.released.load(Ordering::SeqCst)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn device_name(&self) -> &str {
        self.device.name()
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        if !self.released.swap(true, Ordering::SeqCst) {
            debug!("Releasing {} on teardown", self.device.name());
            self.device.release();
        }
    }
}

/// How the simulated user answers the permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Microphone stand-in with a configurable permission answer.
pub struct SimulatedMicrophone {
    name: String,
    permission: Permission,
    prompt_delay: Duration,
    in_use: AtomicBool,
}

impl SimulatedMicrophone {
    pub fn new(permission: Permission) -> Self {
        Self {
            name: "microphone".to_string(),
            permission,
            prompt_delay: Duration::from_millis(200),
            in_use: AtomicBool::new(false),
        }
    }

    /// Time the simulated user takes to answer the prompt.
    pub fn with_prompt_delay(mut self, delay: Duration) -> Self {
        self.prompt_delay = delay;
        self
    }

    pub fn is_in_use(&self) -> bool {
        self.in_use.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptureDevice for SimulatedMicrophone {
    fn name(&self) -> &str {
        &self.name
    }

    async fn request_permission(&self) -> ScanResult<()> {
        tokio::time::sleep(self.prompt_delay).await;
        match self.permission {
            Permission::Granted => Ok(()),
            Permission::Denied => Err(ScanError::PermissionDenied(self.name.clone())),
        }
    }

    fn try_claim(&self) -> bool {
        self.in_use
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn release(&self) {
        self.in_use.store(false, Ordering::SeqCst);
    }
}
