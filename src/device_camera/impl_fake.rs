use crate::device_camera::interface::{DeviceCamera, DeviceCameraError};
use crate::frame::{ChannelOrder, Frame};
use crate::library::logger::interface::Logger;
use rand::Rng;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub struct CameraFakeState {
    pub open: bool,
    pub times_opened: usize,
    pub times_released: usize,
    pub frames_captured: usize,
    /// Scripted results; `None` entries simulate a dropped feed.
    pub script: VecDeque<Option<Frame>>,
    pub fail_open: bool,
}

/// Camera double. Clones share state, so a test can keep one clone while the
/// frame source owns another.
#[derive(Clone)]
pub struct DeviceCameraFake {
    logger: Arc<dyn Logger + Send + Sync>,
    state: Arc<Mutex<CameraFakeState>>,
    width: u32,
    height: u32,
}

impl DeviceCameraFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("fake"),
            state: Arc::default(),
            width: 640,
            height: 480,
        }
    }

    #[cfg(test)]
    pub fn push_frame(&self, frame: Option<Frame>) {
        self.with_state(|state| state.script.push_back(frame));
    }

    #[cfg(test)]
    pub fn fail_next_open(&self) {
        self.with_state(|state| state.fail_open = true);
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut CameraFakeState) -> R) -> R {
        match self.state.lock() {
            Ok(mut state) => f(&mut state),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }

    /// A BGR frame of random noise, the way a webcam driver hands them out.
    fn generated_frame(&self) -> Frame {
        let mut rng = rand::rng();
        let data = (0..self.width * self.height * 3)
            .map(|_| rng.random::<u8>())
            .collect();
        Frame::from_raw(self.width, self.height, data, ChannelOrder::Bgr)
            .unwrap_or_else(|| Frame::solid(self.width, self.height, [0, 0, 0], ChannelOrder::Bgr))
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn open(&mut self) -> Result<(), DeviceCameraError> {
        let _ = self.logger.info("Opening camera...");
        self.with_state(|state| {
            if std::mem::take(&mut state.fail_open) {
                return Err(DeviceCameraError::Open {
                    index: 0,
                    message: "fake camera refused to open".to_string(),
                });
            }
            state.open = true;
            state.times_opened += 1;
            Ok(())
        })?;
        let _ = self.logger.info("Camera opened");
        Ok(())
    }

    fn release(&mut self) -> Result<(), DeviceCameraError> {
        let _ = self.logger.info("Releasing camera");
        self.with_state(|state| {
            state.open = false;
            state.times_released += 1;
        });
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.with_state(|state| state.open)
    }

    fn capture_frame(&mut self) -> Result<Option<Frame>, DeviceCameraError> {
        let scripted = self.with_state(|state| {
            if !state.open {
                return Err(DeviceCameraError::NotOpen);
            }
            state.frames_captured += 1;
            Ok(state.script.pop_front())
        })?;

        match scripted {
            Some(frame) => Ok(frame),
            None => Ok(Some(self.generated_frame())),
        }
    }
}
