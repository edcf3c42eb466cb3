use crate::device_camera::interface::{DeviceCamera, DeviceCameraError};
use crate::frame::{ChannelOrder, Frame};
use crate::library::logger::interface::Logger;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use std::sync::Arc;

/// A webcam reached through nokhwa. The device is only held between `open`
/// and `release`.
pub struct DeviceCameraNokhwa {
    index: u32,
    camera: Option<Camera>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceCameraNokhwa {
    pub fn new(index: u32, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            index,
            camera: None,
            logger: logger.with_namespace("camera").with_namespace("nokhwa"),
        }
    }
}

impl DeviceCamera for DeviceCameraNokhwa {
    fn open(&mut self) -> Result<(), DeviceCameraError> {
        let _ = self.logger.info(&format!("Opening camera {}", self.index));

        let open_error = |e: nokhwa::NokhwaError| DeviceCameraError::Open {
            index: self.index,
            message: e.to_string(),
        };

        let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera = Camera::new(CameraIndex::Index(self.index), format).map_err(open_error)?;
        camera.open_stream().map_err(open_error)?;

        self.camera = Some(camera);
        Ok(())
    }

    fn release(&mut self) -> Result<(), DeviceCameraError> {
        if let Some(mut camera) = self.camera.take() {
            let _ = self.logger.info("Releasing camera");
            camera
                .stop_stream()
                .map_err(|e| DeviceCameraError::Read(e.to_string()))?;
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.camera.is_some()
    }

    fn capture_frame(&mut self) -> Result<Option<Frame>, DeviceCameraError> {
        let camera = self.camera.as_mut().ok_or(DeviceCameraError::NotOpen)?;

        let buffer = match camera.frame() {
            Ok(buffer) => buffer,
            Err(e) => {
                let _ = self.logger.warn(&format!("No frame from camera: {}", e));
                return Ok(None);
            }
        };

        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| DeviceCameraError::Read(e.to_string()))?;
        let (width, height) = (decoded.width(), decoded.height());

        Ok(Frame::from_raw(width, height, decoded.into_raw(), ChannelOrder::Rgb))
    }
}

impl Drop for DeviceCameraNokhwa {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            let _ = self
                .logger
                .error(&format!("Failed to release camera during shutdown: {}", e));
        }
    }
}
