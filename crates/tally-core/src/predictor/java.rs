//! Java predictor adapter.
//!
//! Java scorers arrive either as a compiled jar (MOJO/POJO packaging) or
//! as generated source launched with the single-file source launcher.
//! Both are expected to speak the worker line protocol themselves: print
//! `ready`, then answer one JSON response per request. Java models embed
//! their class labels in the generated scorer, so the label origin is the
//! model. There is no Java hook file.

use std::process::Command;
use std::sync::Arc;

use crate::error::ScoreError;
use crate::inventory::kind::ArtifactKind;
use crate::predictor::foreign::ForeignPredictor;
use crate::predictor::{LabelOrigin, PredictorFactory};

const RUNTIME_NAME: &str = "Java";

pub fn factory(kind: ArtifactKind) -> PredictorFactory {
    Arc::new(move |ctx| {
        // Java has no hook file, so the registry only reaches this factory
        // with an artifact in hand.
        let artifact = ctx.artifact.ok_or_else(|| ScoreError::ModelLoad {
            source: anyhow::anyhow!("Java predictor requires a model artifact"),
        })?;
        let mut command = Command::new("java");
        match kind {
            ArtifactKind::JavaCompiled => {
                command.arg("-jar").arg(artifact);
            }
            // Generated scorer source, run via the source launcher.
            _ => {
                command.arg(artifact);
            }
        }
        let predictor =
            ForeignPredictor::load(RUNTIME_NAME, &mut command, LabelOrigin::Model("java"), ctx)?;
        Ok(Box::new(predictor))
    })
}
