use crate::config::Config;
use crate::frame::ChannelOrder;
use crate::image_classifier::models::model_config::{
    ModelConfig, Normalization, OutputActivation, ResizeMode, TensorLayout,
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Classifies trash from a webcam or still images",
    long_about = None
)]
pub struct Args {
    /// ONNX image classifier
    #[arg(long, default_value = "model.onnx")]
    pub model: PathBuf,

    /// Class names, one per line, in model output order
    #[arg(long, default_value = "labels.txt")]
    pub labels: PathBuf,

    /// Pixel scaling the model was trained with
    #[arg(long, value_enum, required_unless_present = "fake")]
    pub normalization: Option<Normalization>,

    /// Channel order the model expects
    #[arg(long, value_enum, default_value_t = ChannelOrder::Rgb)]
    pub channel_order: ChannelOrder,

    #[arg(long, value_enum, default_value_t = TensorLayout::Nhwc)]
    pub layout: TensorLayout,

    #[arg(long, value_enum, default_value_t = ResizeMode::Stretch)]
    pub resize: ResizeMode,

    /// Whether the model output is already a probability distribution
    #[arg(long, value_enum, default_value_t = OutputActivation::Probabilities)]
    pub output: OutputActivation,

    /// Side length of the square model input
    #[arg(long, default_value_t = 224)]
    pub input_size: u32,

    /// Report the uncertain label when the top confidence is below this
    #[arg(long)]
    pub threshold: Option<f32>,

    #[arg(long)]
    pub uncertain_label: Option<String>,

    #[arg(long)]
    pub correct_root: Option<PathBuf>,

    #[arg(long)]
    pub misclassified_root: Option<PathBuf>,

    #[arg(long)]
    pub capture_interval_ms: Option<u64>,

    #[arg(long)]
    pub camera_index: Option<u32>,

    /// Command that plays a sound file, e.g. "ffplay -nodisp -autoexit -loglevel quiet"
    #[arg(long)]
    pub sound_player: Option<String>,

    #[arg(long)]
    pub no_sound: bool,

    /// Do not keep frames the user confirmed as correct
    #[arg(long)]
    pub no_save_correct: bool,

    /// Text front end on stdin/stdout instead of a window
    #[arg(long)]
    pub console: bool,

    /// Generated frames and random predictions; needs no model or webcam
    #[arg(long)]
    pub fake: bool,
}

impl Args {
    /// Defaults overridden by whatever was given on the command line.
    pub fn config(&self) -> Config {
        let defaults = Config::default();

        Config {
            capture_interval: self
                .capture_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.capture_interval),
            confidence_threshold: self.threshold,
            uncertain_label: self
                .uncertain_label
                .clone()
                .unwrap_or(defaults.uncertain_label),
            save_correct: !self.no_save_correct,
            correct_root: self.correct_root.clone().unwrap_or(defaults.correct_root),
            misclassified_root: self
                .misclassified_root
                .clone()
                .unwrap_or(defaults.misclassified_root),
            play_sounds: !self.no_sound,
            sound_player: self.sound_player.clone(),
            camera_index: self.camera_index.unwrap_or(defaults.camera_index),
            ..defaults
        }
    }

    pub fn model_config(&self) -> ModelConfig {
        // Only --fake gets here without a normalization, and the fake model ignores it.
        let normalization = self.normalization.unwrap_or(Normalization::ZeroToOne);

        ModelConfig {
            input_size: self.input_size,
            channel_order: self.channel_order,
            layout: self.layout,
            resize: self.resize,
            output: self.output,
            ..ModelConfig::new(self.model.clone(), normalization)
        }
    }
}
