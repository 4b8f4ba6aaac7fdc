//! Python predictor adapter.
//!
//! Covers scikit-learn pickles, keras H5/joblib artifacts, pytorch state
//! files and PMML. The worker program is embedded so the host binary is
//! self-contained; it is handed to `python3 -c` and speaks the line
//! protocol from [`crate::predictor::runtime`]. User hooks in `custom.py`
//! run inside the worker, next to the model they operate on.

use std::process::Command;
use std::sync::Arc;

use crate::inventory::kind::ArtifactKind;
use crate::predictor::foreign::ForeignPredictor;
use crate::predictor::{LabelOrigin, PredictorFactory};

const RUNTIME_NAME: &str = "Python";

/// Framework name used in wrong-label diagnostics, per artifact kind.
pub fn framework_name(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::SklearnPickle => "sklearn",
        ArtifactKind::KerasH5 | ArtifactKind::KerasJoblib => "keras",
        ArtifactKind::PytorchState => "torch",
        _ => "pypmml",
    }
}

pub fn factory(kind: ArtifactKind) -> PredictorFactory {
    spawn_factory(LabelOrigin::Model(framework_name(kind)))
}

/// Loader for code directories that carry `custom.py` but no artifact; the
/// worker requires the hook file to define `load_model`. Custom models
/// report no framework, so labels are dataset-derived.
pub fn hook_factory() -> PredictorFactory {
    spawn_factory(LabelOrigin::Dataset)
}

fn spawn_factory(origin: LabelOrigin) -> PredictorFactory {
    Arc::new(move |ctx| {
        let mut command = Command::new("python3");
        command.arg("-c").arg(WORKER_SOURCE);
        let predictor = ForeignPredictor::load(RUNTIME_NAME, &mut command, origin, ctx)?;
        Ok(Box::new(predictor))
    })
}

const WORKER_SOURCE: &str = r#"
import json
import os
import sys

HOOK_NAMES = ("load_model", "transform", "score", "post_process")

model = None
hooks = {}


def respond(obj):
    sys.stdout.write(json.dumps(obj) + "\n")
    sys.stdout.flush()


def load_hooks(code_dir):
    path = os.path.join(code_dir, "custom.py")
    if not os.path.isfile(path):
        return {}
    import importlib.util

    spec = importlib.util.spec_from_file_location("custom", path)
    module = importlib.util.module_from_spec(spec)
    spec.loader.exec_module(module)
    return {n: getattr(module, n) for n in HOOK_NAMES if hasattr(module, n)}


def load_artifact(path):
    if path.endswith((".pkl", ".joblib")):
        try:
            import joblib

            return joblib.load(path)
        except ImportError:
            import pickle

            with open(path, "rb") as fh:
                return pickle.load(fh)
    if path.endswith(".h5"):
        from tensorflow import keras

        return keras.models.load_model(path)
    if path.endswith(".pth"):
        import torch

        return torch.load(path, weights_only=False)
    if path.endswith(".pmml"):
        from pypmml import Model

        return Model.load(path)
    raise ValueError("unsupported artifact: %s" % path)


def handle_load(req):
    global model, hooks
    hooks = load_hooks(req["code_dir"])
    if "load_model" in hooks:
        model = hooks["load_model"](req["code_dir"])
    elif req["artifact"]:
        model = load_artifact(req["artifact"])
    else:
        respond({
            "ok": False,
            "missing_load_model": True,
            "error": "custom.py does not define a load_model hook",
        })
        return
    labels = [str(c) for c in getattr(model, "classes_", [])]
    respond({"ok": True, "class_labels": labels or None})


def handle_predict(req):
    import numpy as np
    import pandas as pd

    frame = pd.DataFrame(req["rows"], columns=req["header"])
    if "transform" in hooks:
        frame = hooks["transform"](frame)
    if "score" in hooks:
        out = hooks["score"](frame, model)
    elif hasattr(model, "predict_proba"):
        out = model.predict_proba(frame)
    else:
        out = model.predict(frame)
    if "post_process" in hooks:
        out = hooks["post_process"](out)
    arr = np.asarray(out, dtype=float)
    if arr.ndim == 2:
        respond({"ok": True, "probabilities": arr.tolist()})
    else:
        respond({"ok": True, "predictions": arr.tolist()})


sys.stdout.write("ready\n")
sys.stdout.flush()
for line in sys.stdin:
    req = json.loads(line)
    try:
        if req["op"] == "load":
            handle_load(req)
        elif req["op"] == "predict":
            handle_predict(req)
        else:
            respond({"ok": False, "error": "unknown op: %s" % req["op"]})
    except Exception as exc:
        respond({"ok": False, "error": str(exc)})
"#;
