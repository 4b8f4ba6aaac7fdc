//! Scoring driver: one end-to-end run.
//!
//! Sequence: scan → resolve → registry lookup → load (hook or default) →
//! validate labels → read input → predict → write output. Any failure at
//! any stage aborts the whole run; output is only written after every
//! prior stage has succeeded, so no partial output file is ever left
//! behind.

use std::path::PathBuf;
use std::time::Duration;

use crate::detect::resolve;
use crate::error::ScoreError;
use crate::frame;
use crate::hooks::{HookSet, HookStage, HookedPredictor};
use crate::inventory::kind::Language;
use crate::inventory::scan;
use crate::labels::{self, ClassLabels, ProblemType};
use crate::predictor::registry::PredictorRegistry;
use crate::predictor::runtime::DEFAULT_STARTUP_TIMEOUT;
use crate::predictor::{LoadContext, Predictor};

/// Everything one scoring run needs.
#[derive(Debug)]
pub struct RunConfig {
    pub code_dir: PathBuf,
    pub input: PathBuf,
    /// Output CSV path; predictions go to stdout when absent.
    pub output: Option<PathBuf>,
    pub problem_type: ProblemType,
    /// Explicit language override; inference otherwise.
    pub language: Option<Language>,
    pub class_labels: Option<ClassLabels>,
    pub startup_timeout: Duration,
}

impl RunConfig {
    pub fn new(code_dir: impl Into<PathBuf>, input: impl Into<PathBuf>) -> Self {
        Self {
            code_dir: code_dir.into(),
            input: input.into(),
            output: None,
            problem_type: ProblemType::Regression,
            language: None,
            class_labels: None,
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
        }
    }
}

/// Successful run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringResult {
    pub language: Language,
    pub rows: usize,
    pub output: Option<PathBuf>,
}

/// Run with the builtin predictor registry and no in-process hooks.
pub fn run(config: &RunConfig) -> Result<ScoringResult, ScoreError> {
    run_with(config, &PredictorRegistry::builtin(), HookSet::default())
}

/// Run with an explicit registry and hook set.
pub fn run_with(
    config: &RunConfig,
    registry: &PredictorRegistry,
    hooks: HookSet,
) -> Result<ScoringResult, ScoreError> {
    let inventory = scan(&config.code_dir)?;
    // An in-process load_model hook is itself a valid loading path, so an
    // explicit override never needs an artifact or hook file to back it.
    let language = match (config.language, &hooks.load_model) {
        (Some(language), Some(_)) => language,
        _ => resolve(&inventory, config.language)?,
    };
    tracing::info!(%language, code_dir = %config.code_dir.display(), "language resolved");

    // A load_model hook replaces registry loading entirely. Without one,
    // a native artifact selects the registry factory; a hook file alone
    // goes through the language's hook loader, whose worker requires the
    // file to define load_model.
    let base: Box<dyn Predictor> = match &hooks.load_model {
        Some(load) => load(&config.code_dir).map_err(|source| ScoreError::HookExecution {
            hook: HookStage::LoadModel,
            source,
        })?,
        None => {
            let missing_artifact = || ScoreError::MissingArtifact {
                code_dir: config.code_dir.display().to_string(),
            };
            match inventory.artifact_for(language) {
                Some(artifact) => {
                    let factory = registry.get(language, artifact.kind)?;
                    let artifact_path = artifact.path(&config.code_dir);
                    let ctx = LoadContext {
                        code_dir: &config.code_dir,
                        artifact: Some(&artifact_path),
                        problem_type: config.problem_type,
                        startup_timeout: config.startup_timeout,
                    };
                    factory(&ctx)?
                }
                None if inventory.has_hook_file(language) => {
                    let factory = registry.hook_loader(language).ok_or_else(missing_artifact)?;
                    let ctx = LoadContext {
                        code_dir: &config.code_dir,
                        artifact: None,
                        problem_type: config.problem_type,
                        startup_timeout: config.startup_timeout,
                    };
                    factory(&ctx)?
                }
                None => return Err(missing_artifact()),
            }
        }
    };

    let mut predictor = HookedPredictor::new(base, hooks);

    let reported = predictor.class_labels();
    labels::validate(
        config.problem_type,
        config.class_labels.as_ref(),
        reported.as_deref(),
        predictor.label_origin(),
    )?;

    let input = frame::read_csv(&config.input)?;
    let predictions = predictor.predict(&input)?;
    let predictions = labels::align(predictions, config.class_labels.as_ref());

    frame::write_output(&predictions, config.output.as_deref())?;

    let result = ScoringResult {
        language,
        rows: predictions.len(),
        output: config.output.clone(),
    };
    tracing::info!(rows = result.rows, "scoring run complete");
    Ok(result)
}
