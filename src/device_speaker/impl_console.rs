use crate::device_speaker::interface::DeviceSpeaker;
use crate::library::logger::interface::Logger;
use std::path::Path;
use std::sync::Arc;

/// Stands in for a speaker when no player is configured.
pub struct DeviceSpeakerConsole {
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceSpeakerConsole {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("speaker").with_namespace("console"),
        }
    }
}

impl DeviceSpeaker for DeviceSpeakerConsole {
    fn play(&self, path: &Path, repeats: u32) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info(&format!(
            "♪ {} (x{})",
            path.display(),
            repeats + 1
        ))
    }
}
