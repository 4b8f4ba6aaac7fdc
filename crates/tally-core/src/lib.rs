pub mod detect;
pub mod error;
pub mod frame;
pub mod hooks;
pub mod inventory;
pub mod labels;
pub mod predictor;
pub mod run;

pub const TOOL_NAME: &str = "tally";

pub use error::ScoreError;
pub use run::{RunConfig, ScoringResult, run, run_with};
