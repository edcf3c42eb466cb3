use crate::frame::{ChannelOrder, Frame};
use crate::image_classifier::interface::{ClassifierError, ImageClassifier, InputBatch};
use crate::image_classifier::models::model_config::{ModelConfig, OutputActivation};
use crate::image_classifier::preprocess::frame_to_batch;
use crate::labels::LabelSet;
use std::sync::Arc;
use thiserror::Error;

const SUM_TOLERANCE: f32 = 1e-3;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error("model produces {outputs} scores but the label file has {labels} labels")]
    LabelCountMismatch { labels: usize, outputs: usize },
    #[error("model returned no output for the frame")]
    EmptyOutput,
    #[error("model output contains a non-finite score")]
    NonFinite,
    #[error("model output sums to {0}, expected a probability distribution")]
    NotADistribution(f32),
    #[error("a confidence threshold needs an uncertain label in the label set")]
    ThresholdWithoutUncertainLabel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Reported class, after the threshold override.
    pub label_index: usize,
    /// Class with the highest confidence.
    pub argmax_index: usize,
    /// Confidence at the argmax.
    pub confidence: f32,
    pub confidences: Vec<f32>,
    pub below_threshold: bool,
}

/// Frame in, prediction out. Holds nothing that changes between calls.
pub struct InferencePipeline {
    classifier: Box<dyn ImageClassifier>,
    labels: Arc<LabelSet>,
    model: ModelConfig,
    threshold: Option<f32>,
}

impl InferencePipeline {
    /// Builds the pipeline and runs one probe frame through the model to
    /// check its output against the label count.
    pub fn new(
        classifier: Box<dyn ImageClassifier>,
        labels: Arc<LabelSet>,
        model: ModelConfig,
        threshold: Option<f32>,
    ) -> Result<Self, PipelineError> {
        if threshold.is_some() && labels.uncertain_index().is_none() {
            return Err(PipelineError::ThresholdWithoutUncertainLabel);
        }

        let pipeline = Self {
            classifier,
            labels,
            model,
            threshold,
        };

        let probe = Frame::solid(
            pipeline.model.input_size,
            pipeline.model.input_size,
            [127, 127, 127],
            ChannelOrder::Rgb,
        );
        let outputs = pipeline.forward(&pipeline.preprocess(&probe))?.len();
        if outputs != pipeline.labels.len() {
            return Err(PipelineError::LabelCountMismatch {
                labels: pipeline.labels.len(),
                outputs,
            });
        }

        Ok(pipeline)
    }

    pub fn preprocess(&self, frame: &Frame) -> InputBatch {
        frame_to_batch(frame, &self.model)
    }

    pub fn predict(&self, frame: &Frame) -> Result<Prediction, PipelineError> {
        let confidences = self.forward(&self.preprocess(frame))?;

        if confidences.len() != self.labels.len() {
            return Err(PipelineError::LabelCountMismatch {
                labels: self.labels.len(),
                outputs: confidences.len(),
            });
        }

        let sum: f32 = confidences.iter().sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(PipelineError::NotADistribution(sum));
        }

        let argmax_index = argmax(&confidences).ok_or(PipelineError::EmptyOutput)?;
        let confidence = confidences[argmax_index];

        let below_threshold = self.threshold.is_some_and(|t| confidence < t);
        let label_index = match self.labels.uncertain_index() {
            Some(uncertain) if below_threshold => uncertain,
            _ => argmax_index,
        };

        Ok(Prediction {
            label_index,
            argmax_index,
            confidence,
            confidences,
            below_threshold,
        })
    }

    /// Scores for the single image in `batch`, softmaxed when the model emits logits.
    fn forward(&self, batch: &InputBatch) -> Result<Vec<f32>, PipelineError> {
        let scores = self
            .classifier
            .predict(batch)?
            .into_iter()
            .next()
            .ok_or(PipelineError::EmptyOutput)?;

        if scores.iter().any(|s| !s.is_finite()) {
            return Err(PipelineError::NonFinite);
        }

        Ok(match self.model.output {
            OutputActivation::Probabilities => scores,
            OutputActivation::Logits => softmax(&scores),
        })
    }
}

pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

/// First index holding the maximum.
fn argmax(values: &[f32]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &v)| match best {
            Some((_, best_v)) if best_v >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}
