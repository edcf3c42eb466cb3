use crate::image_classifier::interface::{ClassifierError, ImageClassifier, InputBatch};
use crate::image_classifier::models::model_config::ModelConfig;
use tract_onnx::prelude::*;

pub struct ImageClassifierTractOnnx {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    input_shape: [usize; 4],
}

impl ImageClassifierTractOnnx {
    pub fn new(config: &ModelConfig) -> Result<Self, ClassifierError> {
        let input_shape = config.input_shape();

        // Pin the input fact so models exported with a symbolic batch axis still optimize.
        let model = tract_onnx::onnx()
            .model_for_path(&config.onnx_model_path)
            .and_then(|model| model.with_input_fact(0, f32::fact(input_shape).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| ClassifierError::ModelLoad {
                path: config.onnx_model_path.display().to_string(),
                message: e.to_string(),
            })?;

        Ok(Self { model, input_shape })
    }
}

impl ImageClassifier for ImageClassifierTractOnnx {
    fn predict(&self, batch: &InputBatch) -> Result<Vec<Vec<f32>>, ClassifierError> {
        if batch.shape()[1..] != self.input_shape[1..] {
            return Err(ClassifierError::InputShape {
                expected: self.input_shape,
                actual: batch.shape().to_vec(),
            });
        }

        let mut results = Vec::new();

        for image in batch.axis_chunks_iter(tract_ndarray::Axis(0), 1) {
            let input = image.to_owned().into_tensor();

            let outputs = self
                .model
                .run(tvec!(input.into_tvalue()))
                .map_err(|e| ClassifierError::Inference(e.to_string()))?;

            let output = outputs
                .first()
                .ok_or_else(|| ClassifierError::Inference("model has no outputs".to_string()))?
                .to_array_view::<f32>()
                .map_err(|e| ClassifierError::Inference(e.to_string()))?;

            results.push(output.iter().copied().collect());
        }

        Ok(results)
    }
}
