use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InferenceError {
    #[error("model expects {expected} features, got {got}")]
    FeatureCount { expected: usize, got: usize },
    #[error("feature {index} is not a finite number")]
    NonFinite { index: usize },
    #[error("{0}")]
    Model(String),
}

/// Produces a class label for one feature vector.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<i64, InferenceError>;
}

/// A classifier that can also estimate per-class probabilities.
pub trait ProbabilisticClassifier: Classifier {
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError>;
}

/// A loaded model, tagged by the capabilities it offers.
#[derive(Clone)]
pub enum Model {
    ClassOnly(Arc<dyn Classifier>),
    WithConfidence(Arc<dyn ProbabilisticClassifier>),
}

impl Model {
    pub fn class_only<C: Classifier + 'static>(classifier: C) -> Self {
        Model::ClassOnly(Arc::new(classifier))
    }

    pub fn with_confidence<C: ProbabilisticClassifier + 'static>(classifier: C) -> Self {
        Model::WithConfidence(Arc::new(classifier))
    }

    /// Class label plus the highest class probability when the model can estimate it.
    pub fn infer(&self, features: &[f64]) -> Result<(i64, Option<f64>), InferenceError> {
        match self {
            Model::ClassOnly(c) => Ok((c.predict(features)?, None)),
            Model::WithConfidence(c) => {
                let class = c.predict(features)?;
                let confidence = c
                    .predict_proba(features)?
                    .into_iter()
                    .fold(None, |best: Option<f64>, p| Some(best.map_or(p, |b| b.max(p))));
                Ok((class, confidence))
            }
        }
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Model::ClassOnly(_) => f.write_str("Model::ClassOnly"),
            Model::WithConfidence(_) => f.write_str("Model::WithConfidence"),
        }
    }
}

pub(crate) fn check_features(features: &[f64], expected: usize) -> Result<(), InferenceError> {
    if features.len() != expected {
        return Err(InferenceError::FeatureCount {
            expected,
            got: features.len(),
        });
    }
    if let Some(index) = features.iter().position(|v| !v.is_finite()) {
        return Err(InferenceError::NonFinite { index });
    }
    Ok(())
}
