//! Error taxonomy for a scoring run.
//!
//! Every variant is terminal for the current run: detection and validation
//! are pure functions of on-disk state, so nothing is retried. The message
//! strings below are an external contract (tests and operator tooling grep
//! them literally) and must not be reworded casually.

use std::path::PathBuf;

use thiserror::Error;

use crate::hooks::HookStage;
use crate::inventory::kind::Language;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Code directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Code directory is not readable: {}: {source}", .path.display())]
    DirectoryNotReadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Merged diagnostic for both the empty and the conflicting inventory.
    /// The shared sentence is part of the external contract.
    #[error("Can not detect language by artifacts and/or custom.py/R files")]
    AmbiguousLanguage,

    /// A language was resolved (via hook files) but no artifact exists and
    /// no `load_model` hook was supplied to replace default loading.
    #[error("Could not find model artifact file in: {code_dir} supported by default predictors")]
    MissingArtifact { code_dir: String },

    /// An explicit language override has neither a native artifact nor a
    /// hook file that could carry a `load_model` escape hatch.
    #[error(
        "Could not find a serialized model artifact with {extensions} extension, \
         supported by default {language} predictor. If your artifact is not supported \
         by default predictor, implement custom.load_model hook."
    )]
    MissingArtifactForLanguage {
        language: Language,
        extensions: String,
    },

    #[error(
        "{language} predictor can not use artifact {artifact}; default {language} \
         predictor supports {extensions} artifacts. If your artifact is not supported \
         by default predictor, implement custom.load_model hook."
    )]
    UnsupportedCombination {
        language: Language,
        artifact: String,
        extensions: String,
    },

    /// Wording of `advice` differs by label origin: frameworks that embed
    /// labels in the artifact point at the model, the rest at the dataset.
    #[error("Wrong class labels. {advice}")]
    WrongClassLabels { advice: String },

    #[error("Error while executing {hook} hook: {source}")]
    HookExecution {
        hook: HookStage,
        #[source]
        source: anyhow::Error,
    },

    #[error("Could not start {runtime} runtime: {source}")]
    RuntimeUnavailable {
        runtime: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{runtime} runtime did not become ready within {timeout_secs}s")]
    RuntimeStartupTimeout { runtime: String, timeout_secs: u64 },

    #[error("Failed to load model artifact: {source}")]
    ModelLoad {
        #[source]
        source: anyhow::Error,
    },

    #[error("Prediction failed: {source}")]
    Prediction {
        #[source]
        source: anyhow::Error,
    },

    #[error("Invalid input dataset {}: {source}", .path.display())]
    InputFormat {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_language_message_is_stable() {
        assert_eq!(
            ScoreError::AmbiguousLanguage.to_string(),
            "Can not detect language by artifacts and/or custom.py/R files"
        );
    }

    #[test]
    fn missing_r_artifact_names_extension_and_escape_hatch() {
        let err = ScoreError::MissingArtifactForLanguage {
            language: Language::R,
            extensions: ".rds".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Could not find a serialized model artifact with .rds extension"));
        assert!(msg.contains("supported by default R predictor"));
        assert!(msg.contains("implement custom.load_model hook"));
    }

    #[test]
    fn missing_artifact_names_code_dir() {
        let err = ScoreError::MissingArtifact {
            code_dir: "/tmp/model".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Could not find model artifact file in: /tmp/model supported by default predictors"
        );
    }

    #[test]
    fn hook_error_carries_hook_name() {
        let err = ScoreError::HookExecution {
            hook: HookStage::Transform,
            source: anyhow::anyhow!("boom"),
        };
        assert_eq!(err.to_string(), "Error while executing transform hook: boom");
    }
}
