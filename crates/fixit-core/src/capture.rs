//! Live-capture seam for the troubleshooting sub-flow.
//!
//! Acquisition is scoped: a [`CaptureSession`] owns the underlying device
//! for its lifetime and releases it on drop. The step machine holds the
//! session inside its stuck mode, so every exit transition releases the
//! device exactly once without manual stop calls.

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{RepairError, Result};
use crate::models::Photo;

/// A source of live capture sessions (a camera, in the original flow).
///
/// Acquisition may fail (missing device, denied permission) and that
/// failure is recoverable: the caller surfaces a message and stays in its
/// normal mode.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Acquires the device, returning an owned session.
    async fn acquire(&self) -> Result<Box<dyn CaptureSession>>;
}

/// An acquired capture handle. Dropping it releases the device.
pub trait CaptureSession: Send {
    /// Grabs the current frame.
    fn frame(&mut self) -> Result<Photo>;
}

/// Capture device that reads frames from an image file on disk.
///
/// Stands in for a camera in the CLI: `fixit walk`'s stuck flow points it
/// at a photo the user took out of band.
#[derive(Debug, Clone)]
pub struct FileCaptureDevice {
    path: PathBuf,
}

impl FileCaptureDevice {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CaptureDevice for FileCaptureDevice {
    async fn acquire(&self) -> Result<Box<dyn CaptureSession>> {
        if !self.path.is_file() {
            return Err(RepairError::Capture {
                reason: format!("No such image file: {}", self.path.display()),
            });
        }
        Ok(Box::new(FileCaptureSession {
            path: self.path.clone(),
        }))
    }
}

struct FileCaptureSession {
    path: PathBuf,
}

impl CaptureSession for FileCaptureSession {
    fn frame(&mut self) -> Result<Photo> {
        let bytes = fs::read(&self.path).map_err(|e| RepairError::Capture {
            reason: format!("Failed to read {}: {e}", self.path.display()),
        })?;
        Ok(Photo::from_bytes(&bytes))
    }
}
