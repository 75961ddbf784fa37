//! JSON model artifacts produced by the offline training step.
//!
//! Two kinds are understood:
//! - `random_forest`: trees exported as parallel node arrays (`children_left`,
//!   `children_right`, `feature`, `threshold`, `value`), the layout scikit-learn
//!   uses for its fitted `tree_`. Leaves have `-1` children. Offers class
//!   probabilities.
//! - `threshold`: a single-feature cut-off rule. Class label only.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::classifier::{check_features, Classifier, InferenceError, Model, ProbabilisticClassifier};

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("cannot read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Artifact {
    RandomForest(RandomForest),
    Threshold(ThresholdRule),
}

impl Artifact {
    pub fn into_model(self) -> Result<Model, ModelLoadError> {
        match self {
            Artifact::RandomForest(forest) => {
                forest.validate()?;
                Ok(Model::with_confidence(forest))
            }
            Artifact::Threshold(rule) => {
                if !rule.threshold.is_finite() {
                    return Err(ModelLoadError::Invalid("threshold must be finite".into()));
                }
                Ok(Model::class_only(rule))
            }
        }
    }
}

/// Reads an artifact from disk. A missing file is not an error: it yields `None`.
pub fn load(path: &Path) -> Result<Option<Model>, ModelLoadError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ModelLoadError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    parse(&raw).map(Some)
}

pub fn parse(raw: &str) -> Result<Model, ModelLoadError> {
    let artifact: Artifact = serde_json::from_str(raw)?;
    artifact.into_model()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights, one entry per class.
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    fn validate(&self, n_classes: usize) -> Result<(), String> {
        let n = self.children_left.len();
        if n == 0 {
            return Err("tree has no nodes".into());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err("node arrays differ in length".into());
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            let leaf = left == -1 && right == -1;
            if !leaf {
                // Children always come after their parent, so traversal terminates.
                for child in [left, right] {
                    if child <= node as i64 || child >= n as i64 {
                        return Err(format!("node {} has invalid child {}", node, child));
                    }
                }
                if self.feature[node] < 0 {
                    return Err(format!("split node {} has no feature", node));
                }
                if !self.threshold[node].is_finite() {
                    return Err(format!("split node {} has a non-finite threshold", node));
                }
            }
            let weights = &self.value[node];
            if weights.len() != n_classes {
                return Err(format!(
                    "node {} has {} class weights, expected {}",
                    node,
                    weights.len(),
                    n_classes
                ));
            }
            let total: f64 = weights.iter().sum();
            let usable = weights.iter().all(|w| w.is_finite() && *w >= 0.0)
                && total.is_finite()
                && total > 0.0;
            if leaf && !usable {
                return Err(format!("leaf {} has no usable class weights", node));
            }
        }
        Ok(())
    }

    fn leaf_distribution(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        let mut node = 0usize;
        while self.children_left[node] != -1 {
            let index = self.feature[node] as usize;
            let x = *features.get(index).ok_or_else(|| {
                InferenceError::Model(format!("split on missing feature {}", index))
            })?;
            node = if x <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }

        let weights = &self.value[node];
        let total: f64 = weights.iter().sum();
        Ok(weights.iter().map(|w| w / total).collect())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    fn validate(&self) -> Result<(), ModelLoadError> {
        if self.classes.is_empty() {
            return Err(ModelLoadError::Invalid("forest has no classes".into()));
        }
        if self.trees.is_empty() {
            return Err(ModelLoadError::Invalid("forest has no trees".into()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.classes.len())
                .map_err(|reason| ModelLoadError::Invalid(format!("tree {}: {}", i, reason)))?;
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn predict(&self, features: &[f64]) -> Result<i64, InferenceError> {
        let proba = self.predict_proba(features)?;
        let best = proba
            .iter()
            .enumerate()
            .fold(0, |best, (i, p)| if *p > proba[best] { i } else { best });
        Ok(self.classes[best])
    }
}

impl ProbabilisticClassifier for RandomForest {
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        check_features(features, self.n_features)?;

        let mut sum = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (acc, p) in sum.iter_mut().zip(tree.leaf_distribution(features)?) {
                *acc += p;
            }
        }
        let n = self.trees.len() as f64;
        Ok(sum.into_iter().map(|s| s / n).collect())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdRule {
    pub n_features: usize,
    pub feature: usize,
    pub threshold: f64,
    pub below: i64,
    pub at_or_above: i64,
}

impl Classifier for ThresholdRule {
    fn predict(&self, features: &[f64]) -> Result<i64, InferenceError> {
        check_features(features, self.n_features)?;
        let x = *features.get(self.feature).ok_or_else(|| {
            InferenceError::Model(format!("rule reads missing feature {}", self.feature))
        })?;
        Ok(if x < self.threshold {
            self.below
        } else {
            self.at_or_above
        })
    }
}
