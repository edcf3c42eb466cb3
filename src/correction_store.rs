use crate::frame::Frame;
use crate::library::clock::interface::Clock;
use crate::library::logger::interface::Logger;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorrectionStoreError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Saves frames as `<root>/<label>/<timestamp>.jpg` for later retraining.
pub struct CorrectionStore {
    root: PathBuf,
    clock: Arc<dyn Clock>,
    timezone: chrono::FixedOffset,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl CorrectionStore {
    pub fn new(
        root: PathBuf,
        clock: Arc<dyn Clock>,
        timezone: chrono::FixedOffset,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            root,
            clock,
            timezone,
            logger: logger.with_namespace("correction_store"),
        }
    }

    /// Writes `frame` under the label's directory, creating it if needed.
    /// Never overwrites: a name already taken gets a `_1`, `_2`, ... suffix.
    pub fn save(&self, frame: &Frame, label: &str) -> Result<PathBuf, CorrectionStoreError> {
        let dir = self.root.join(label);
        std::fs::create_dir_all(&dir).map_err(|source| CorrectionStoreError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let path = self.free_path(&dir);
        frame
            .save(&path)
            .map_err(|source| CorrectionStoreError::Write {
                path: path.clone(),
                source,
            })?;

        let _ = self.logger.info(&format!("Saved {}", path.display()));
        Ok(path)
    }

    fn free_path(&self, dir: &Path) -> PathBuf {
        let stamp = self
            .clock
            .wall_time()
            .with_timezone(&self.timezone)
            .format("%Y%m%d_%H%M%S_%3f")
            .to_string();

        let mut path = dir.join(format!("{}.jpg", stamp));
        let mut counter = 1;
        while path.exists() {
            path = dir.join(format!("{}_{}.jpg", stamp, counter));
            counter += 1;
        }
        path
    }
}
