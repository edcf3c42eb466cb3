use crate::frame::ChannelOrder;
use std::path::PathBuf;

/// Pixel scaling applied before the forward pass. It has to be the one the
/// model was trained with; a mismatch gives wrong predictions without any error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Normalization {
    /// `p / 255`, giving `[0, 1]`.
    #[value(name = "zero-to-one")]
    ZeroToOne,
    /// `p / 127.5 - 1`, giving `[-1, 1]`.
    #[value(name = "minus-one-to-one")]
    MinusOneToOne,
}

impl Normalization {
    pub fn apply(&self, value: u8) -> f32 {
        match self {
            Normalization::ZeroToOne => value as f32 / 255.0,
            Normalization::MinusOneToOne => value as f32 / 127.5 - 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TensorLayout {
    /// `[batch, height, width, channel]`, what Keras exports.
    #[default]
    Nhwc,
    /// `[batch, channel, height, width]`.
    Nchw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ResizeMode {
    /// Scale both axes to the input size, ignoring aspect ratio.
    #[default]
    Stretch,
    /// Keep aspect ratio and pad the short side with black.
    Letterbox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputActivation {
    /// The model ends in a softmax layer.
    #[default]
    Probabilities,
    /// Raw scores; softmax is applied after the forward pass.
    Logits,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub onnx_model_path: PathBuf,
    pub input_size: u32,
    pub normalization: Normalization,
    pub channel_order: ChannelOrder,
    pub layout: TensorLayout,
    pub resize: ResizeMode,
    pub output: OutputActivation,
}

impl ModelConfig {
    pub fn new(onnx_model_path: PathBuf, normalization: Normalization) -> Self {
        Self {
            onnx_model_path,
            input_size: 224,
            normalization,
            channel_order: ChannelOrder::Rgb,
            layout: TensorLayout::default(),
            resize: ResizeMode::default(),
            output: OutputActivation::default(),
        }
    }

    pub fn input_shape(&self) -> [usize; 4] {
        let size = self.input_size as usize;
        match self.layout {
            TensorLayout::Nhwc => [1, size, size, 3],
            TensorLayout::Nchw => [1, 3, size, size],
        }
    }
}
