use crate::device_display::interface::{DeviceDisplay, View};
use crate::labels::LabelSet;
use crate::library::logger::interface::Logger;
use crate::trash_classifier::core::{Session, State};
use std::sync::Arc;

pub struct Render {
    device_display: Box<dyn DeviceDisplay>,
    labels: Arc<LabelSet>,
    fallback_icon: String,
    /// What the picker offers after a prediction is flagged as wrong.
    correction_choices: Vec<String>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl Render {
    pub fn new(
        device_display: Box<dyn DeviceDisplay>,
        labels: Arc<LabelSet>,
        fallback_icon: String,
        correction_choices: Vec<String>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            device_display,
            labels,
            fallback_icon,
            correction_choices,
            logger: logger.with_namespace("render"),
        }
    }

    pub fn view(&self, state: &State) -> View {
        let mut view = View {
            status: state.status.clone(),
            live: state.session != Session::Stopped,
            ..View::default()
        };

        if let Some(snapshot) = &state.snapshot {
            let prediction = &snapshot.prediction;
            view.headline = self.labels.get(prediction.label_index).map(|label| {
                format!(
                    "{} {}",
                    label.icon.as_deref().unwrap_or(&self.fallback_icon),
                    label.name.to_uppercase()
                )
            });
            view.confidence = Some(prediction.confidence);
            view.probabilities = self
                .labels
                .iter()
                .map(|label| label.name.clone())
                .zip(prediction.confidences.iter().copied())
                .collect();
            view.preview = Some(snapshot.frame.clone());
            view.feedback_enabled = state.correcting.is_none();
        }

        if state.correcting.is_some() {
            view.correction_choices = self.correction_choices.clone();
        }

        view
    }

    /// Display failures are logged; the loop keeps going.
    pub fn render(&mut self, state: &State) {
        let view = self.view(state);
        if let Err(e) = self.device_display.show(&view) {
            let _ = self.logger.error(&format!("Failed to render: {}", e));
        }
    }
}
