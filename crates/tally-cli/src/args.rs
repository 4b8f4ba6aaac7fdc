use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use tally_core::inventory::kind::Language;

#[derive(Debug, Parser)]
#[command(
    name = "tally",
    version,
    about = "Model scoring dispatch for serialized model artifacts"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score an input dataset against the model in a code directory
    Score(ScoreArgs),
}

#[derive(Debug, clap::Args)]
pub struct ScoreArgs {
    /// Directory containing the model artifact and optional hook code
    #[arg(long)]
    pub code_dir: PathBuf,

    /// Input dataset (CSV with a header row)
    #[arg(long)]
    pub input: PathBuf,

    /// Write predictions to a file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Force the target language instead of detecting it
    #[arg(long)]
    pub language: Option<LanguageArg>,

    /// Positive class label (binary classification)
    #[arg(long, requires = "negative_class_label")]
    pub positive_class_label: Option<String>,

    /// Negative class label (binary classification)
    #[arg(long, requires = "positive_class_label")]
    pub negative_class_label: Option<String>,

    /// Comma-separated class labels (multiclass classification)
    #[arg(long, value_delimiter = ',', conflicts_with = "positive_class_label")]
    pub class_labels: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LanguageArg {
    Python,
    R,
    Java,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::Python => Language::Python,
            LanguageArg::R => Language::R,
            LanguageArg::Java => Language::Java,
        }
    }
}
