//! Predictor registry: static configuration mapping a resolved language
//! and artifact kind to the factory that can load it.
//!
//! The builtin table is fixed at startup and never mutated at runtime.
//! Tests (and embedders) may build a registry with injected factories so
//! the scoring driver can be exercised without a foreign runtime.

use crate::error::ScoreError;
use crate::inventory::kind::{ArtifactKind, Language};
use crate::predictor::{PredictorFactory, java, python, r};

pub struct PredictorRegistry {
    entries: Vec<((Language, ArtifactKind), PredictorFactory)>,
    hook_loaders: Vec<(Language, PredictorFactory)>,
}

impl PredictorRegistry {
    /// The default adapter table: every artifact kind under its native
    /// language, plus hook-only loaders for the languages with a hook file
    /// (`custom.py`, `custom.R`). Cross-language entries do not exist; an
    /// override that lands on one needs the `load_model` escape hatch.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for kind in [
            ArtifactKind::SklearnPickle,
            ArtifactKind::KerasH5,
            ArtifactKind::KerasJoblib,
            ArtifactKind::PytorchState,
            ArtifactKind::Pmml,
        ] {
            registry.register(Language::Python, kind, python::factory(kind));
        }
        registry.register(Language::R, ArtifactKind::RSerialized, r::factory());
        for kind in [ArtifactKind::JavaCodegenSource, ArtifactKind::JavaCompiled] {
            registry.register(Language::Java, kind, java::factory(kind));
        }
        registry.register_hook_loader(Language::Python, python::hook_factory());
        registry.register_hook_loader(Language::R, r::factory());
        registry
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            hook_loaders: Vec::new(),
        }
    }

    /// Single-entry registry; the usual shape for driver tests.
    pub fn with_factory(
        language: Language,
        kind: ArtifactKind,
        factory: PredictorFactory,
    ) -> Self {
        let mut registry = Self::empty();
        registry.register(language, kind, factory);
        registry
    }

    pub fn register(&mut self, language: Language, kind: ArtifactKind, factory: PredictorFactory) {
        self.entries.push(((language, kind), factory));
    }

    pub fn register_hook_loader(&mut self, language: Language, factory: PredictorFactory) {
        self.hook_loaders.push((language, factory));
    }

    /// Loader for a code directory that carries a hook file but no
    /// artifact; the hook file must define `load_model`. Only languages
    /// with a hook file have one.
    pub fn hook_loader(&self, language: Language) -> Option<&PredictorFactory> {
        self.hook_loaders
            .iter()
            .find(|(l, _)| *l == language)
            .map(|(_, factory)| factory)
    }

    /// Look up the factory for a resolved language and artifact kind.
    ///
    /// The missing-entry diagnostic names the extensions the language's
    /// default predictor expects, pointing at the `load_model` escape
    /// hatch.
    pub fn get(
        &self,
        language: Language,
        kind: ArtifactKind,
    ) -> Result<&PredictorFactory, ScoreError> {
        self.entries
            .iter()
            .find(|((l, k), _)| *l == language && *k == kind)
            .map(|(_, factory)| factory)
            .ok_or_else(|| ScoreError::UnsupportedCombination {
                language,
                artifact: kind.extension().to_string(),
                extensions: language.default_extensions(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::frame::Frame;
    use crate::predictor::{Predictions, Predictor};

    #[test]
    fn builtin_covers_every_kind_under_its_native_language() {
        let registry = PredictorRegistry::builtin();
        for kind in ArtifactKind::ALL {
            registry
                .get(kind.language(), kind)
                .unwrap_or_else(|e| panic!("missing builtin entry for {kind:?}: {e}"));
        }
    }

    #[test]
    fn builtin_hook_loaders_exist_only_for_hook_file_languages() {
        let registry = PredictorRegistry::builtin();
        assert!(registry.hook_loader(Language::Python).is_some());
        assert!(registry.hook_loader(Language::R).is_some());
        assert!(registry.hook_loader(Language::Java).is_none());
    }

    #[test]
    fn cross_language_lookup_names_expected_extensions() {
        let registry = PredictorRegistry::builtin();
        let err = registry
            .get(Language::R, ArtifactKind::SklearnPickle)
            .err()
            .expect("no R entry for pickles");

        match &err {
            ScoreError::UnsupportedCombination {
                language,
                artifact,
                extensions,
            } => {
                assert_eq!(*language, Language::R);
                assert_eq!(artifact, ".pkl");
                assert_eq!(extensions, ".rds");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("custom.load_model hook"));
    }

    #[test]
    fn injected_factory_is_returned() {
        struct Stub;
        impl Predictor for Stub {
            fn predict(&mut self, frame: &Frame) -> Result<Predictions, ScoreError> {
                Ok(Predictions::Regression(vec![0.0; frame.len()]))
            }
        }

        let registry = PredictorRegistry::with_factory(
            Language::Python,
            ArtifactKind::SklearnPickle,
            Arc::new(|_| Ok(Box::new(Stub))),
        );
        registry
            .get(Language::Python, ArtifactKind::SklearnPickle)
            .unwrap();
        assert!(
            registry
                .get(Language::Python, ArtifactKind::KerasH5)
                .is_err()
        );
    }
}
