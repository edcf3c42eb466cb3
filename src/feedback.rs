use crate::correction_store::{CorrectionStore, CorrectionStoreError};
use crate::device_speaker::interface::DeviceSpeaker;
use crate::frame::Frame;
use crate::labels::LabelSet;
use crate::library::logger::interface::Logger;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("no label with index {0}")]
    UnknownLabel(usize),
    #[error(transparent)]
    Store(#[from] CorrectionStoreError),
}

/// What happens after the user judges a prediction.
pub struct FeedbackSink {
    labels: Arc<LabelSet>,
    correct_store: Option<CorrectionStore>,
    misclassified_store: CorrectionStore,
    speaker: Option<Box<dyn DeviceSpeaker>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl FeedbackSink {
    /// `correct_store` is `None` when confirmed frames should not be kept, and
    /// `speaker` is `None` when cues are muted.
    pub fn new(
        labels: Arc<LabelSet>,
        correct_store: Option<CorrectionStore>,
        misclassified_store: CorrectionStore,
        speaker: Option<Box<dyn DeviceSpeaker>>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            labels,
            correct_store,
            misclassified_store,
            speaker,
            logger: logger.with_namespace("feedback"),
        }
    }

    /// The user agreed with `label_index`. Plays its cue and keeps the frame
    /// under the predicted label. Returns where the frame went, if anywhere.
    pub fn confirm(
        &self,
        frame: &Frame,
        label_index: usize,
    ) -> Result<Option<PathBuf>, FeedbackError> {
        let label = self
            .labels
            .get(label_index)
            .ok_or(FeedbackError::UnknownLabel(label_index))?;
        let _ = self.logger.info(&format!("Confirmed: {}", label.name));

        if let (Some(speaker), Some(cue)) = (&self.speaker, &label.sound_cue) {
            if !self.labels.is_uncertain(label_index) {
                if let Err(e) = speaker.play(&cue.path, cue.repeats) {
                    let _ = self.logger.error(&format!(
                        "Error playing sound {}: {}",
                        cue.path.display(),
                        e
                    ));
                }
            }
        }

        match &self.correct_store {
            Some(store) => Ok(Some(store.save(frame, &label.name)?)),
            None => Ok(None),
        }
    }

    /// Labels the user can pick from after flagging a prediction as wrong.
    pub fn correction_choices(&self) -> Vec<String> {
        self.labels.names()
    }

    /// Keeps `frame` under the label the user says is right.
    pub fn select_correction(
        &self,
        frame: &Frame,
        label_index: usize,
    ) -> Result<PathBuf, FeedbackError> {
        let label = self
            .labels
            .name(label_index)
            .ok_or(FeedbackError::UnknownLabel(label_index))?;
        let _ = self.logger.info(&format!("Corrected to: {}", label));

        Ok(self.misclassified_store.save(frame, label)?)
    }
}
