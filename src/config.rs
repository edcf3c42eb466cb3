use chrono::Offset;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("confidence threshold must be within [0, 1], got {0}")]
    ThresholdOutOfRange(f32),
    #[error("capture interval must be greater than zero")]
    ZeroCaptureInterval,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoundCueConfig {
    pub label: String,
    pub path: PathBuf,
    pub repeats: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelIconConfig {
    pub label: String,
    pub icon: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub capture_interval: Duration,
    pub confidence_threshold: Option<f32>,
    pub uncertain_label: String,
    pub save_correct: bool,
    pub correct_root: PathBuf,
    pub misclassified_root: PathBuf,
    pub play_sounds: bool,
    pub sound_player: Option<String>,
    pub sound_cues: Vec<SoundCueConfig>,
    pub label_icons: Vec<LabelIconConfig>,
    pub fallback_icon: String,
    pub camera_index: u32,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capture_interval: Duration::from_millis(100),
            confidence_threshold: None,
            uncertain_label: "nothing".to_string(),
            save_correct: true,
            correct_root: PathBuf::from("data/correctly_classified"),
            misclassified_root: PathBuf::from("data/misclassified"),
            play_sounds: true,
            sound_player: None,
            sound_cues: vec![
                sound_cue("cans & bottles", "binRed.mp3"),
                sound_cue("general", "binYellow.mp3"),
                sound_cue("papers", "binBlue.mp3"),
            ],
            label_icons: vec![
                icon("cans & bottles", "🥤"),
                icon("general", "🗑️"),
                icon("papers", "📄"),
                icon("nothing", "❌"),
            ],
            fallback_icon: "🔍".to_string(),
            camera_index: 0,
            logger_timezone: utc(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(threshold) = self.confidence_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::ThresholdOutOfRange(threshold));
            }
        }

        if self.capture_interval.is_zero() {
            return Err(ConfigError::ZeroCaptureInterval);
        }

        Ok(())
    }
}

fn sound_cue(label: &str, path: &str) -> SoundCueConfig {
    SoundCueConfig {
        label: label.to_string(),
        path: PathBuf::from(path),
        repeats: 2,
    }
}

fn icon(label: &str, icon: &str) -> LabelIconConfig {
    LabelIconConfig {
        label: label.to_string(),
        icon: icon.to_string(),
    }
}

fn utc() -> chrono::FixedOffset {
    chrono::Utc.fix()
}
