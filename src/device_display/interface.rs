use crate::frame::Frame;
use crate::trash_classifier::core::Status;
use std::error::Error;
use std::sync::Arc;

/// Everything a front end needs to draw one refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct View {
    /// Icon and upper-cased label, e.g. `🥤 CANS & BOTTLES`.
    pub headline: Option<String>,
    /// Confidence at the argmax, in `[0, 1]`.
    pub confidence: Option<f32>,
    pub probabilities: Vec<(String, f32)>,
    pub status: Option<Status>,
    pub preview: Option<Arc<Frame>>,
    pub live: bool,
    pub feedback_enabled: bool,
    /// Non-empty while the user is picking the correct label.
    pub correction_choices: Vec<String>,
}

pub trait DeviceDisplay: Send {
    fn show(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>>;
}
