use thiserror::Error;
use tract_onnx::prelude::tract_ndarray::Array4;

/// A batch of preprocessed images, laid out as the model expects.
pub type InputBatch = Array4<f32>;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("failed to load model {path}: {message}")]
    ModelLoad { path: String, message: String },
    #[error("input batch has shape {actual:?}, model expects {expected:?}")]
    InputShape {
        expected: [usize; 4],
        actual: Vec<usize>,
    },
    #[error("forward pass failed: {0}")]
    Inference(String),
}

/// A pretrained classifier: one confidence vector per image in the batch.
pub trait ImageClassifier: Send + Sync {
    fn predict(&self, batch: &InputBatch) -> Result<Vec<Vec<f32>>, ClassifierError>;
}
