//! Class-label validation.
//!
//! Cross-checks CLI-declared labels against labels the loaded model
//! reports. Binary comparison is set-based (order matters for output
//! columns, not for equality); multiclass requires exact set equality,
//! a deliberate, revisitable policy documented in DESIGN.md. Regression
//! and anomaly runs have nothing to validate.

use std::collections::BTreeSet;

use crate::error::ScoreError;
use crate::predictor::{LabelOrigin, Predictions};

/// The prediction problem a run is scored as. Supplied externally; it only
/// constrains which validation rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemType {
    Regression,
    Binary,
    Multiclass,
    Anomaly,
}

impl ProblemType {
    pub fn as_str(self) -> &'static str {
        match self {
            ProblemType::Regression => "regression",
            ProblemType::Binary => "binary",
            ProblemType::Multiclass => "multiclass",
            ProblemType::Anomaly => "anomaly",
        }
    }
}

impl std::fmt::Display for ProblemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared class labels: an ordered positive/negative pair for binary,
/// an unordered (but order-preserving for output columns) set otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassLabels {
    Binary { positive: String, negative: String },
    Multiclass(Vec<String>),
}

impl ClassLabels {
    /// Binary labels must be two distinct, non-empty values.
    pub fn binary(
        positive: impl Into<String>,
        negative: impl Into<String>,
    ) -> Result<Self, ScoreError> {
        let positive = positive.into();
        let negative = negative.into();
        if positive.is_empty() || negative.is_empty() || positive == negative {
            return Err(ScoreError::WrongClassLabels {
                advice: "Positive and negative class labels must be two distinct values"
                    .to_string(),
            });
        }
        Ok(ClassLabels::Binary { positive, negative })
    }

    /// Multiclass labels must be non-empty and distinct.
    pub fn multiclass(labels: Vec<String>) -> Result<Self, ScoreError> {
        let distinct: BTreeSet<&String> = labels.iter().collect();
        if labels.is_empty() || distinct.len() != labels.len() {
            return Err(ScoreError::WrongClassLabels {
                advice: "Class labels must be a non-empty set of distinct values".to_string(),
            });
        }
        Ok(ClassLabels::Multiclass(labels))
    }

    /// Labels in output-column order: positive before negative for binary,
    /// declaration order for multiclass.
    pub fn ordered(&self) -> Vec<String> {
        match self {
            ClassLabels::Binary { positive, negative } => {
                vec![positive.clone(), negative.clone()]
            }
            ClassLabels::Multiclass(labels) => labels.clone(),
        }
    }

    fn as_set(&self) -> BTreeSet<String> {
        self.ordered().into_iter().collect()
    }
}

fn wrong_labels(origin: LabelOrigin) -> ScoreError {
    let advice = match origin {
        LabelOrigin::Model(framework) => {
            format!("Use class labels detected by {framework} model")
        }
        LabelOrigin::Dataset => "Use class labels according to your dataset".to_string(),
    };
    ScoreError::WrongClassLabels { advice }
}

/// Validate declared labels against model-reported labels for the given
/// problem type. A no-op for regression and anomaly.
pub fn validate(
    problem_type: ProblemType,
    declared: Option<&ClassLabels>,
    reported: Option<&[String]>,
    origin: LabelOrigin,
) -> Result<(), ScoreError> {
    match problem_type {
        ProblemType::Regression | ProblemType::Anomaly => Ok(()),
        ProblemType::Binary => {
            let Some(labels @ ClassLabels::Binary { .. }) = declared else {
                return Err(ScoreError::WrongClassLabels {
                    advice: "Positive and negative class labels are required for binary \
                             classification"
                        .to_string(),
                });
            };
            let Some(reported) = reported else {
                // Framework reports nothing; nothing to cross-check.
                return Ok(());
            };
            let reported_set: BTreeSet<String> = reported.iter().cloned().collect();
            if labels.as_set() != reported_set {
                return Err(wrong_labels(origin));
            }
            Ok(())
        }
        ProblemType::Multiclass => {
            let Some(labels @ ClassLabels::Multiclass(_)) = declared else {
                return Err(ScoreError::WrongClassLabels {
                    advice: "Class labels are required for multiclass classification".to_string(),
                });
            };
            let Some(reported) = reported else {
                return Ok(());
            };
            let reported_set: BTreeSet<String> = reported.iter().cloned().collect();
            // Exact set equality; see DESIGN.md for the policy decision.
            if labels.as_set() != reported_set {
                return Err(wrong_labels(origin));
            }
            Ok(())
        }
    }
}

/// Reorder classification probability columns into declared label order.
///
/// Validation has already established set equality, so every declared
/// label has exactly one source column. Regression output and runs
/// without declared labels pass through untouched.
pub fn align(predictions: Predictions, declared: Option<&ClassLabels>) -> Predictions {
    let Some(declared) = declared else {
        return predictions;
    };
    let Predictions::Classification { labels, rows } = predictions else {
        return predictions;
    };

    let order = declared.ordered();
    if order == labels {
        return Predictions::Classification { labels, rows };
    }

    // An unmatched label would mean validation was skipped; keep the
    // predictor's own order rather than emit misnamed columns.
    let indices: Option<Vec<usize>> = order
        .iter()
        .map(|want| labels.iter().position(|have| have == want))
        .collect();
    let Some(indices) = indices else {
        return Predictions::Classification { labels, rows };
    };

    let rows = rows
        .iter()
        .map(|row| indices.iter().map(|&i| row[i]).collect())
        .collect();
    Predictions::Classification {
        labels: order,
        rows,
    }
}
