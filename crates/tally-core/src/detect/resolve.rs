//! Language resolution over a scanned inventory.
//!
//! This is a pure function of the inventory and the optional user override.
//! No filesystem access, no side effects; callers pattern-match on the
//! returned `Result` instead of catching exceptions.
//!
//! Resolution policy, in priority order:
//!
//!   1. An explicit override always wins, provided an override-compatible
//!      loading path exists: a native artifact, or a hook file that can
//!      carry a `load_model` hook.
//!   2. Otherwise, exactly one implied language resolves to it.
//!   3. Zero or multiple implied languages fail with the same merged
//!      `AmbiguousLanguage` diagnostic.
//!
//! The merged diagnostic for the empty and the conflicting case is a
//! deliberate contract: downstream tooling greps one sentence for both.

use crate::error::ScoreError;
use crate::inventory::kind::Language;
use crate::inventory::scan::CodeDirectoryInventory;

/// Resolve the single language/framework this run commits to.
pub fn resolve(
    inventory: &CodeDirectoryInventory,
    explicit: Option<Language>,
) -> Result<Language, ScoreError> {
    if let Some(language) = explicit {
        if inventory.artifact_for(language).is_some() || inventory.has_hook_file(language) {
            tracing::debug!(%language, "language forced by override");
            return Ok(language);
        }
        return Err(ScoreError::MissingArtifactForLanguage {
            language,
            extensions: language.default_extensions(),
        });
    }

    let implied = inventory.implied_languages();
    let mut iter = implied.iter();
    match (iter.next(), iter.next()) {
        (Some(&language), None) => {
            tracing::debug!(%language, "language detected from inventory");
            Ok(language)
        }
        // Empty and conflicting inventories share one diagnostic.
        _ => Err(ScoreError::AmbiguousLanguage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    use crate::inventory::kind::ArtifactKind;
    use crate::inventory::scan::ArtifactFile;

    fn inventory(
        artifacts: &[(&str, ArtifactKind)],
        hooks: &[Language],
    ) -> CodeDirectoryInventory {
        CodeDirectoryInventory {
            code_dir: PathBuf::from("/model"),
            artifacts: artifacts
                .iter()
                .map(|(name, kind)| ArtifactFile {
                    file_name: name.to_string(),
                    kind: *kind,
                })
                .collect(),
            hook_languages: hooks.iter().copied().collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn empty_inventory_is_ambiguous() {
        let err = resolve(&inventory(&[], &[]), None).unwrap_err();
        assert!(matches!(err, ScoreError::AmbiguousLanguage));
    }

    #[test]
    fn single_artifact_resolves_its_language() {
        let inv = inventory(&[("model.pkl", ArtifactKind::SklearnPickle)], &[]);
        assert_eq!(resolve(&inv, None).unwrap(), Language::Python);

        let inv = inventory(&[("model.rds", ArtifactKind::RSerialized)], &[]);
        assert_eq!(resolve(&inv, None).unwrap(), Language::R);
    }

    #[test]
    fn hook_file_alone_resolves_its_language() {
        let inv = inventory(&[], &[Language::R]);
        assert_eq!(resolve(&inv, None).unwrap(), Language::R);
    }

    #[test]
    fn conflicting_artifact_and_hook_is_ambiguous() {
        // python artifact, custom.R
        let inv = inventory(&[("model.pkl", ArtifactKind::SklearnPickle)], &[Language::R]);
        let err = resolve(&inv, None).unwrap_err();
        assert!(matches!(err, ScoreError::AmbiguousLanguage));

        // R artifact, custom.py
        let inv = inventory(
            &[("model.rds", ArtifactKind::RSerialized)],
            &[Language::Python],
        );
        let err = resolve(&inv, None).unwrap_err();
        assert!(matches!(err, ScoreError::AmbiguousLanguage));
    }

    #[test]
    fn two_artifact_languages_without_override_are_ambiguous() {
        let inv = inventory(
            &[
                ("model.java", ArtifactKind::JavaCodegenSource),
                ("model.pkl", ArtifactKind::SklearnPickle),
            ],
            &[],
        );
        let err = resolve(&inv, None).unwrap_err();
        assert!(matches!(err, ScoreError::AmbiguousLanguage));
    }

    #[test]
    fn override_disambiguates_competing_artifacts() {
        let inv = inventory(
            &[
                ("model.java", ArtifactKind::JavaCodegenSource),
                ("model.pkl", ArtifactKind::SklearnPickle),
            ],
            &[],
        );
        assert_eq!(resolve(&inv, Some(Language::Java)).unwrap(), Language::Java);
        assert_eq!(
            resolve(&inv, Some(Language::Python)).unwrap(),
            Language::Python
        );
    }

    #[test]
    fn override_beats_a_conflicting_natural_language() {
        // Java artifact, custom.py hook: forcing java is valid via artifact,
        // forcing python is valid via the load_model escape hatch.
        let inv = inventory(
            &[("model.java", ArtifactKind::JavaCodegenSource)],
            &[Language::Python],
        );
        assert_eq!(resolve(&inv, Some(Language::Java)).unwrap(), Language::Java);
        assert_eq!(
            resolve(&inv, Some(Language::Python)).unwrap(),
            Language::Python
        );
    }

    #[test]
    fn override_without_compatible_path_names_extension() {
        let inv = inventory(
            &[
                ("model.java", ArtifactKind::JavaCodegenSource),
                ("model.pkl", ArtifactKind::SklearnPickle),
            ],
            &[],
        );
        let err = resolve(&inv, Some(Language::R)).unwrap_err();
        match &err {
            ScoreError::MissingArtifactForLanguage {
                language,
                extensions,
            } => {
                assert_eq!(*language, Language::R);
                assert_eq!(extensions, ".rds");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains(".rds extension"));
        assert!(err.to_string().contains("custom.load_model hook"));
    }

    #[test]
    fn resolution_is_deterministic() {
        let inv = inventory(&[("model.rds", ArtifactKind::RSerialized)], &[Language::R]);
        assert_eq!(resolve(&inv, None).unwrap(), resolve(&inv, None).unwrap());
    }
}
