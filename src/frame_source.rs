use crate::device_camera::interface::{DeviceCamera, DeviceCameraError};
use crate::frame::Frame;
use crate::library::logger::interface::Logger;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameSourceError {
    #[error("stop the webcam before opening an image")]
    LiveSessionActive,
    #[error("no live session is running")]
    NotLive,
    #[error("failed to load image {path}: {source}")]
    Load {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error(transparent)]
    Camera(#[from] DeviceCameraError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    NotRunning,
}

/// Owns the camera. Frames come either from a live session or from a still
/// image on disk, never both at once.
pub struct FrameSource {
    camera: Box<dyn DeviceCamera>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl FrameSource {
    pub fn new(camera: Box<dyn DeviceCamera>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            camera,
            logger: logger.with_namespace("frame_source"),
        }
    }

    pub fn is_live(&self) -> bool {
        self.camera.is_open()
    }

    pub fn start_live(&mut self) -> Result<StartOutcome, FrameSourceError> {
        if self.camera.is_open() {
            let _ = self.logger.warn("Live session already running");
            return Ok(StartOutcome::AlreadyRunning);
        }

        self.camera.open()?;
        let _ = self.logger.info("Live session started");
        Ok(StartOutcome::Started)
    }

    pub fn stop_live(&mut self) -> Result<StopOutcome, FrameSourceError> {
        if !self.camera.is_open() {
            return Ok(StopOutcome::NotRunning);
        }

        self.camera.release()?;
        let _ = self.logger.info("Live session stopped");
        Ok(StopOutcome::Stopped)
    }

    /// Next live frame, or `None` when the camera has nothing to give this tick.
    pub fn poll(&mut self) -> Result<Option<Frame>, FrameSourceError> {
        if !self.camera.is_open() {
            return Err(FrameSourceError::NotLive);
        }

        let frame = self.camera.capture_frame()?;
        if frame.is_none() {
            let _ = self.logger.warn("Camera returned no frame");
        }
        Ok(frame)
    }

    pub fn load_still(&self, path: &Path) -> Result<Frame, FrameSourceError> {
        if self.camera.is_open() {
            let _ = self
                .logger
                .warn("Refusing to load a still image during a live session");
            return Err(FrameSourceError::LiveSessionActive);
        }

        let frame = Frame::open(path).map_err(|source| FrameSourceError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let _ = self
            .logger
            .info(&format!("Loaded {} ({:?})", path.display(), frame));
        Ok(frame)
    }
}
