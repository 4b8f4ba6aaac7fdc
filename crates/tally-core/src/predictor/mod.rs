//! Capability contract over predictor frameworks.
//!
//! One closed interface covers scikit-learn, keras, pytorch, PMML, R and
//! Java scorers: load via a factory keyed by `(Language, ArtifactKind)`,
//! then predict over a whole frame. The scoring driver never learns
//! whether a call crosses a process boundary.

pub mod foreign;
pub mod java;
pub mod python;
pub mod r;
pub mod registry;
pub mod runtime;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ScoreError;
use crate::frame::Frame;
use crate::labels::ProblemType;

/// Where the canonical class labels for a framework come from.
///
/// Drives the wording of wrong-label diagnostics: some frameworks embed
/// labels in the artifact, others only ever see them in training data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelOrigin {
    /// Labels are recoverable from the model artifact itself.
    Model(&'static str),
    /// Labels exist only in the training dataset.
    Dataset,
}

/// Batched prediction output for one run.
#[derive(Debug, Clone, PartialEq)]
pub enum Predictions {
    /// One value per input row (regression and anomaly).
    Regression(Vec<f64>),
    /// One probability per class label per input row.
    Classification {
        labels: Vec<String>,
        rows: Vec<Vec<f64>>,
    },
}

impl Predictions {
    /// Number of scored rows.
    pub fn len(&self) -> usize {
        match self {
            Predictions::Regression(values) => values.len(),
            Predictions::Classification { rows, .. } => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A loaded, callable predictor bound to one language and one artifact.
///
/// Handles owning a foreign runtime release it on drop; no handle outlives
/// its run.
pub trait Predictor {
    /// Score every row of the frame in one atomic call.
    fn predict(&mut self, frame: &Frame) -> Result<Predictions, ScoreError>;

    /// Class labels recoverable from the loaded model, when the framework
    /// reports any.
    fn class_labels(&self) -> Option<Vec<String>> {
        None
    }

    fn label_origin(&self) -> LabelOrigin {
        LabelOrigin::Dataset
    }

    /// Raw-bytes entry point for predictors that support it.
    fn predict_unstructured(&mut self, _data: &[u8]) -> Result<Vec<u8>, ScoreError> {
        Err(ScoreError::Prediction {
            source: anyhow::anyhow!("unstructured scoring is not supported by this predictor"),
        })
    }
}

/// Everything a factory needs to turn an artifact path into a predictor.
///
/// `artifact` is absent on the hook-only loading path, where the code
/// directory carries a hook file whose `load_model` replaces default
/// artifact loading.
#[derive(Debug, Clone)]
pub struct LoadContext<'a> {
    pub code_dir: &'a Path,
    pub artifact: Option<&'a Path>,
    pub problem_type: ProblemType,
    /// Bound on foreign-runtime readiness.
    pub startup_timeout: Duration,
}

/// Factory entry stored in the registry. `Arc` so a registry can be shared
/// and entries cloned out without re-instantiating anything.
pub type PredictorFactory =
    Arc<dyn Fn(&LoadContext<'_>) -> Result<Box<dyn Predictor>, ScoreError> + Send + Sync>;
