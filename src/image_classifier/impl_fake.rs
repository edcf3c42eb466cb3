use crate::image_classifier::interface::{ClassifierError, ImageClassifier, InputBatch};
use crate::image_classifier::pipeline::softmax;
use rand::distr::{Distribution, Uniform};
use std::sync::{Arc, Mutex};

enum Scores {
    #[cfg(test)]
    Fixed(Vec<f32>),
    Random { classes: usize },
}

pub struct ImageClassifierFake {
    scores: Scores,
    seen_shapes: Arc<Mutex<Vec<Vec<usize>>>>,
}

impl ImageClassifierFake {
    /// Returns `scores` for every image.
    #[cfg(test)]
    pub fn fixed(scores: Vec<f32>) -> Self {
        Self {
            scores: Scores::Fixed(scores),
            seen_shapes: Arc::default(),
        }
    }

    /// Returns a fresh random probability vector over `classes` for every image.
    pub fn random(classes: usize) -> Self {
        Self {
            scores: Scores::Random { classes },
            seen_shapes: Arc::default(),
        }
    }

    /// Shapes of the batches passed to `predict`, in call order.
    #[cfg(test)]
    pub fn seen_shapes(&self) -> Arc<Mutex<Vec<Vec<usize>>>> {
        self.seen_shapes.clone()
    }

    fn scores(&self) -> Result<Vec<f32>, ClassifierError> {
        match &self.scores {
            #[cfg(test)]
            Scores::Fixed(scores) => Ok(scores.clone()),
            Scores::Random { classes } => {
                let mut rng = rand::rng();
                let logit_dist = Uniform::new(0.0f32, 4.0)
                    .map_err(|e| ClassifierError::Inference(e.to_string()))?;
                let logits: Vec<f32> = (0..*classes)
                    .map(|_| logit_dist.sample(&mut rng))
                    .collect();
                Ok(softmax(&logits))
            }
        }
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn predict(&self, batch: &InputBatch) -> Result<Vec<Vec<f32>>, ClassifierError> {
        if let Ok(mut shapes) = self.seen_shapes.lock() {
            shapes.push(batch.shape().to_vec());
        }

        (0..batch.shape()[0]).map(|_| self.scores()).collect()
    }
}
