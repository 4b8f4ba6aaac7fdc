//! Static registry of known artifact suffixes and hook-file basenames.
//!
//! Classification is purely by filename pattern. File contents are never
//! inspected at this stage; a `.pkl` file is a scikit-learn pickle as far
//! as the scanner is concerned, and the predictor adapter finds out the
//! truth at load time.

use std::fmt;

/// The language/framework runtime a run commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    Python,
    R,
    Java,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Python, Language::R, Language::Java];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::R => "R",
            Language::Java => "Java",
        }
    }

    /// Artifact extensions the default predictor of this language accepts,
    /// rendered for diagnostics (e.g. ".rds" or ".pkl/.h5/.joblib/.pth/.pmml").
    pub fn default_extensions(self) -> String {
        let exts: Vec<&str> = ArtifactKind::ALL
            .iter()
            .filter(|k| k.language() == self)
            .map(|k| k.extension())
            .collect();
        exts.join("/")
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Enumerated kinds of serialized model artifacts the scanner recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    SklearnPickle,
    KerasH5,
    KerasJoblib,
    PytorchState,
    Pmml,
    RSerialized,
    JavaCodegenSource,
    JavaCompiled,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 8] = [
        ArtifactKind::SklearnPickle,
        ArtifactKind::KerasH5,
        ArtifactKind::KerasJoblib,
        ArtifactKind::PytorchState,
        ArtifactKind::Pmml,
        ArtifactKind::RSerialized,
        ArtifactKind::JavaCodegenSource,
        ArtifactKind::JavaCompiled,
    ];

    /// Filename extension associated with this kind, dot included.
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::SklearnPickle => ".pkl",
            ArtifactKind::KerasH5 => ".h5",
            ArtifactKind::KerasJoblib => ".joblib",
            ArtifactKind::PytorchState => ".pth",
            ArtifactKind::Pmml => ".pmml",
            ArtifactKind::RSerialized => ".rds",
            ArtifactKind::JavaCodegenSource => ".java",
            ArtifactKind::JavaCompiled => ".jar",
        }
    }

    /// The language whose default predictor handles this kind.
    pub fn language(self) -> Language {
        match self {
            ArtifactKind::SklearnPickle
            | ArtifactKind::KerasH5
            | ArtifactKind::KerasJoblib
            | ArtifactKind::PytorchState
            | ArtifactKind::Pmml => Language::Python,
            ArtifactKind::RSerialized => Language::R,
            ArtifactKind::JavaCodegenSource | ArtifactKind::JavaCompiled => Language::Java,
        }
    }

    /// Classify a filename by extension. Matching is case-insensitive
    /// because R artifacts circulate as both `.rds` and `.RDS`.
    pub fn from_filename(file_name: &str) -> Option<ArtifactKind> {
        let lower = file_name.to_ascii_lowercase();
        ArtifactKind::ALL
            .iter()
            .copied()
            .find(|k| lower.ends_with(k.extension()))
    }
}

/// Reserved basename for user hook files (`custom.py`, `custom.R`).
pub const CUSTOM_FILE_BASENAME: &str = "custom";

/// Hook-file language implied by a filename, if any. Java models carry no
/// hook file; only Python and R hooks exist.
pub fn hook_language(file_name: &str) -> Option<Language> {
    match file_name {
        "custom.py" => Some(Language::Python),
        "custom.R" | "custom.r" => Some(Language::R),
        _ => None,
    }
}
