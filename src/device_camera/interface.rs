use crate::frame::Frame;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceCameraError {
    #[error("camera {index} could not be opened: {message}")]
    Open { index: u32, message: String },
    #[error("camera is not open")]
    NotOpen,
    #[error("camera read failed: {0}")]
    Read(String),
}

pub trait DeviceCamera {
    /// Acquires the device. Calling it on an open camera is an error the
    /// caller is expected to avoid.
    fn open(&mut self) -> Result<(), DeviceCameraError>;

    /// Gives the device back so it can be opened again later.
    fn release(&mut self) -> Result<(), DeviceCameraError>;

    fn is_open(&self) -> bool;

    /// `Ok(None)` means no frame right now (unplugged, not ready); try again
    /// on the next tick.
    fn capture_frame(&mut self) -> Result<Option<Frame>, DeviceCameraError>;
}
