//! Shared adapter over any worker-protocol runtime.
//!
//! Python, R and Java predictors differ only in the command they spawn and
//! the framework their labels originate from; everything after the spawn
//! is this one adapter. Dropping the predictor drops the runtime, which
//! kills the worker.

use std::process::Command;

use crate::error::ScoreError;
use crate::frame::Frame;
use crate::predictor::runtime::{RuntimeProcess, WorkerRequest, WorkerResponse};
use crate::predictor::{LabelOrigin, LoadContext, Predictions, Predictor};

#[derive(Debug)]
pub struct ForeignPredictor {
    runtime: RuntimeProcess,
    origin: LabelOrigin,
    model_labels: Option<Vec<String>>,
}

impl ForeignPredictor {
    /// Spawn the worker, issue the load request and capture any labels the
    /// model reports. Startup failures keep their infrastructure variants;
    /// a failing load request is a `ModelLoad` error, except the hook-only
    /// path with no `load_model` hook, which is the missing-artifact case.
    pub fn load(
        name: &str,
        command: &mut Command,
        origin: LabelOrigin,
        ctx: &LoadContext<'_>,
    ) -> Result<Self, ScoreError> {
        let mut runtime = RuntimeProcess::spawn(name, command, ctx.startup_timeout)?;

        let artifact = ctx
            .artifact
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let response = runtime
            .request(&WorkerRequest::Load {
                artifact,
                code_dir: ctx.code_dir.display().to_string(),
                problem_type: ctx.problem_type.as_str().to_string(),
            })
            .map_err(|source| ScoreError::ModelLoad { source })?;
        if !response.ok {
            if response.missing_load_model {
                return Err(ScoreError::MissingArtifact {
                    code_dir: ctx.code_dir.display().to_string(),
                });
            }
            return Err(ScoreError::ModelLoad {
                source: anyhow::anyhow!("{}", worker_detail(response.error)),
            });
        }

        tracing::debug!(
            runtime = runtime.name(),
            labels = ?response.class_labels,
            "model loaded in foreign runtime"
        );

        Ok(Self {
            runtime,
            origin,
            model_labels: response.class_labels,
        })
    }

    fn into_predictions(&self, response: WorkerResponse) -> Result<Predictions, ScoreError> {
        if let Some(rows) = response.probabilities {
            let labels = response
                .class_labels
                .or_else(|| self.model_labels.clone())
                .ok_or_else(|| ScoreError::Prediction {
                    source: anyhow::anyhow!(
                        "worker returned class probabilities without class labels"
                    ),
                })?;
            return Ok(Predictions::Classification { labels, rows });
        }
        if let Some(values) = response.predictions {
            return Ok(Predictions::Regression(values));
        }
        Err(ScoreError::Prediction {
            source: anyhow::anyhow!("worker returned neither predictions nor probabilities"),
        })
    }
}

fn worker_detail(error: Option<String>) -> String {
    error.unwrap_or_else(|| "unknown worker error".to_string())
}

impl Predictor for ForeignPredictor {
    fn predict(&mut self, frame: &Frame) -> Result<Predictions, ScoreError> {
        let response = self
            .runtime
            .request(&WorkerRequest::Predict {
                header: frame.header.clone(),
                rows: frame.rows.clone(),
            })
            .map_err(|source| ScoreError::Prediction { source })?;
        if !response.ok {
            return Err(ScoreError::Prediction {
                source: anyhow::anyhow!("{}", worker_detail(response.error)),
            });
        }
        self.into_predictions(response)
    }

    fn class_labels(&self) -> Option<Vec<String>> {
        self.model_labels.clone()
    }

    fn label_origin(&self) -> LabelOrigin {
        self.origin
    }
}
