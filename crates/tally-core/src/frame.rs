//! Tabular input/output for one scoring run.
//!
//! Input is a CSV dataset with a header row, read whole into memory before
//! any prediction happens. Output is likewise fully materialized as CSV
//! bytes before a single byte reaches the destination, so a failing run
//! never leaves a partial output file behind.

use std::io::Write;
use std::path::Path;

use crate::error::ScoreError;
use crate::predictor::Predictions;

/// Column name used for regression and anomaly output.
pub const PREDICTIONS_COLUMN: &str = "Predictions";

/// An in-memory tabular dataset: header plus string-valued rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Frame {
    /// Number of data rows (the header is not counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read a CSV dataset with a header row.
pub fn read_csv(path: &Path) -> Result<Frame, ScoreError> {
    let input_err = |source| ScoreError::InputFormat {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(input_err)?;

    let header = reader
        .headers()
        .map_err(input_err)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(input_err)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Frame { header, rows })
}

/// Render predictions to CSV bytes.
///
/// Regression and anomaly produce a single `Predictions` column;
/// classification produces one probability column per class label, in the
/// label order carried by the predictions themselves.
pub fn render_predictions(predictions: &Predictions) -> Result<Vec<u8>, ScoreError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    // Output-side failures are prediction errors, not input errors.
    let render_err = |source: csv::Error| ScoreError::Prediction {
        source: anyhow::Error::new(source).context("failed to render predictions"),
    };

    match predictions {
        Predictions::Regression(values) => {
            writer
                .write_record([PREDICTIONS_COLUMN])
                .map_err(render_err)?;
            for value in values {
                writer.write_record([value.to_string()]).map_err(render_err)?;
            }
        }
        Predictions::Classification { labels, rows } => {
            writer.write_record(labels).map_err(render_err)?;
            for row in rows {
                if row.len() != labels.len() {
                    return Err(ScoreError::Prediction {
                        source: anyhow::anyhow!(
                            "predictor produced {} probabilities for {} class labels",
                            row.len(),
                            labels.len()
                        ),
                    });
                }
                let cells: Vec<String> = row.iter().map(|p| p.to_string()).collect();
                writer.write_record(&cells).map_err(render_err)?;
            }
        }
    }

    writer.into_inner().map_err(|e| ScoreError::Prediction {
        source: anyhow::anyhow!("failed to finalize rendered output: {e}"),
    })
}

/// Write rendered predictions to the output path, or stdout when none is
/// given. The destination file is only created after rendering succeeds.
pub fn write_output(predictions: &Predictions, output: Option<&Path>) -> Result<(), ScoreError> {
    let bytes = render_predictions(predictions)?;

    match output {
        Some(path) => std::fs::write(path, &bytes).map_err(|source| ScoreError::Prediction {
            source: anyhow::Error::new(source)
                .context(format!("failed to write output file {}", path.display())),
        }),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&bytes)
                .and_then(|()| stdout.flush())
                .map_err(|source| ScoreError::Prediction {
                    source: anyhow::Error::new(source).context("failed to write predictions"),
                })
        }
    }
}
