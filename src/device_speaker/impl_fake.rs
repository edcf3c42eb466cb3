use crate::device_speaker::interface::DeviceSpeaker;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct DeviceSpeakerFake {
    played: Arc<Mutex<Vec<(PathBuf, u32)>>>,
    broken: bool,
}

impl DeviceSpeakerFake {
    pub fn new() -> Self {
        Self::default()
    }

    /// A speaker whose every `play` fails.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn played(&self) -> Vec<(PathBuf, u32)> {
        match self.played.lock() {
            Ok(played) => played.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DeviceSpeaker for DeviceSpeakerFake {
    fn play(&self, path: &Path, repeats: u32) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.broken {
            return Err("audio device unavailable".into());
        }
        self.played
            .lock()
            .map_err(|e| e.to_string())?
            .push((path.to_path_buf(), repeats));
        Ok(())
    }
}
