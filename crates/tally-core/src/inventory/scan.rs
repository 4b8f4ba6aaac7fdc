//! Artifact scanner: one read-only pass over a code directory.
//!
//! The scanner classifies every entry by filename against the registry in
//! [`crate::inventory::kind`] and records all matches. It never picks a
//! winner between competing artifacts; that is the resolver's job.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::ScoreError;
use crate::inventory::kind::{ArtifactKind, Language, hook_language};

/// One recognized artifact file inside the code directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    pub file_name: String,
    pub kind: ArtifactKind,
}

impl ArtifactFile {
    pub fn path(&self, code_dir: &Path) -> PathBuf {
        code_dir.join(&self.file_name)
    }
}

/// Immutable snapshot of a code directory.
///
/// Created once per run; all later stages read it and never mutate it.
/// Artifacts are sorted by filename so downstream behavior does not depend
/// on filesystem iteration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeDirectoryInventory {
    pub code_dir: PathBuf,
    pub artifacts: Vec<ArtifactFile>,
    pub hook_languages: BTreeSet<Language>,
}

impl CodeDirectoryInventory {
    /// Languages implied by artifact kinds alone.
    pub fn artifact_languages(&self) -> BTreeSet<Language> {
        self.artifacts.iter().map(|a| a.kind.language()).collect()
    }

    /// Union of languages implied by artifacts and hook files.
    pub fn implied_languages(&self) -> BTreeSet<Language> {
        let mut langs = self.artifact_languages();
        langs.extend(self.hook_languages.iter().copied());
        langs
    }

    /// First artifact (in filename order) native to the given language.
    pub fn artifact_for(&self, language: Language) -> Option<&ArtifactFile> {
        self.artifacts
            .iter()
            .find(|a| a.kind.language() == language)
    }

    pub fn has_hook_file(&self, language: Language) -> bool {
        self.hook_languages.contains(&language)
    }
}

/// Scan a code directory and build its inventory.
///
/// Fails with `DirectoryNotFound` when the path does not exist or is not a
/// directory, and `DirectoryNotReadable` when listing it fails. Regular
/// read errors on individual entries do not occur because only names are
/// examined, never contents.
pub fn scan(code_dir: &Path) -> Result<CodeDirectoryInventory, ScoreError> {
    if !code_dir.is_dir() {
        return Err(ScoreError::DirectoryNotFound(code_dir.to_path_buf()));
    }

    let entries = std::fs::read_dir(code_dir).map_err(|source| ScoreError::DirectoryNotReadable {
        path: code_dir.to_path_buf(),
        source,
    })?;

    let mut artifacts = Vec::new();
    let mut hook_languages = BTreeSet::new();

    for entry in entries {
        let entry = entry.map_err(|source| ScoreError::DirectoryNotReadable {
            path: code_dir.to_path_buf(),
            source,
        })?;
        let Ok(file_name) = entry.file_name().into_string() else {
            continue; // non-UTF-8 names can never match the registry
        };

        if let Some(kind) = ArtifactKind::from_filename(&file_name) {
            artifacts.push(ArtifactFile { file_name, kind });
        } else if let Some(language) = hook_language(&file_name) {
            hook_languages.insert(language);
        }
    }

    artifacts.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    tracing::debug!(
        code_dir = %code_dir.display(),
        artifacts = artifacts.len(),
        hooks = hook_languages.len(),
        "scanned code directory"
    );

    Ok(CodeDirectoryInventory {
        code_dir: code_dir.to_path_buf(),
        artifacts,
        hook_languages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn dir_with(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in files {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        dir
    }

    #[test]
    fn empty_directory_yields_empty_inventory() {
        let dir = dir_with(&[]);
        let inv = scan(dir.path()).unwrap();

        assert!(inv.artifacts.is_empty());
        assert!(inv.hook_languages.is_empty());
        assert!(inv.implied_languages().is_empty());
    }

    #[test]
    fn records_all_artifacts_without_picking_a_winner() {
        let dir = dir_with(&["model.jar", "model.pkl", "model.java"]);
        let inv = scan(dir.path()).unwrap();

        assert_eq!(inv.artifacts.len(), 3);
        // Sorted by filename, not discovery order.
        assert_eq!(inv.artifacts[0].file_name, "model.jar");
        assert_eq!(inv.artifacts[1].file_name, "model.java");
        assert_eq!(inv.artifacts[2].file_name, "model.pkl");

        let langs = inv.artifact_languages();
        assert!(langs.contains(&Language::Java));
        assert!(langs.contains(&Language::Python));
    }

    #[test]
    fn hook_files_are_detected_by_basename() {
        let dir = dir_with(&["custom.py", "helper.py", "custom.R"]);
        let inv = scan(dir.path()).unwrap();

        assert!(inv.artifacts.is_empty());
        assert!(inv.has_hook_file(Language::Python));
        assert!(inv.has_hook_file(Language::R));
        assert!(!inv.has_hook_file(Language::Java));
    }

    #[test]
    fn implied_languages_union_artifacts_and_hooks() {
        let dir = dir_with(&["model.pkl", "custom.R"]);
        let inv = scan(dir.path()).unwrap();

        let langs = inv.implied_languages();
        assert_eq!(langs.len(), 2);
        assert!(langs.contains(&Language::Python));
        assert!(langs.contains(&Language::R));
    }

    #[test]
    fn artifact_for_prefers_filename_order() {
        let dir = dir_with(&["b_model.pkl", "a_model.h5"]);
        let inv = scan(dir.path()).unwrap();

        let artifact = inv.artifact_for(Language::Python).unwrap();
        assert_eq!(artifact.file_name, "a_model.h5");
        assert!(inv.artifact_for(Language::R).is_none());
    }

    #[test]
    fn missing_directory_is_not_found() {
        let err = scan(Path::new("/nonexistent/tally/dir")).unwrap_err();
        assert!(matches!(err, ScoreError::DirectoryNotFound(_)));
    }

    #[test]
    fn file_path_is_not_a_directory() {
        let dir = dir_with(&["model.pkl"]);
        let err = scan(&dir.path().join("model.pkl")).unwrap_err();
        assert!(matches!(err, ScoreError::DirectoryNotFound(_)));
    }
}
