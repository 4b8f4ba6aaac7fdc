//! Hook pipeline: user lifecycle hooks around a base predictor.
//!
//! Execution order per scoring call is fixed and documented:
//!
//!   transform(input) → score (replaces base predict when supplied)
//!   → post_process(output)
//!
//! `load_model`, when supplied, replaces the registry's default loading
//! entirely; the scoring driver consults it before ever touching the
//! registry. Hooks run synchronously, once per scoring call. Any hook
//! failure aborts the run as `HookExecution` carrying the hook name.

use std::fmt;
use std::path::Path;

use crate::error::ScoreError;
use crate::frame::Frame;
use crate::predictor::{LabelOrigin, Predictions, Predictor};

/// Names of the recognized lifecycle hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    LoadModel,
    Transform,
    Score,
    PostProcess,
}

impl HookStage {
    pub const ALL: [HookStage; 4] = [
        HookStage::LoadModel,
        HookStage::Transform,
        HookStage::Score,
        HookStage::PostProcess,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HookStage::LoadModel => "load_model",
            HookStage::Transform => "transform",
            HookStage::Score => "score",
            HookStage::PostProcess => "post_process",
        }
    }
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type LoadModelHook =
    Box<dyn Fn(&Path) -> anyhow::Result<Box<dyn Predictor>> + Send + Sync>;
pub type TransformHook = Box<dyn Fn(Frame) -> anyhow::Result<Frame> + Send + Sync>;
pub type ScoreHook = Box<dyn Fn(&Frame) -> anyhow::Result<Predictions> + Send + Sync>;
pub type PostProcessHook = Box<dyn Fn(Predictions) -> anyhow::Result<Predictions> + Send + Sync>;

/// The set of user-supplied hooks for one run.
///
/// Constructed once, immutable thereafter; unset entries fall back to the
/// predictor's default behavior.
#[derive(Default)]
pub struct HookSet {
    pub load_model: Option<LoadModelHook>,
    pub transform: Option<TransformHook>,
    pub score: Option<ScoreHook>,
    pub post_process: Option<PostProcessHook>,
}

impl HookSet {
    pub fn is_empty(&self) -> bool {
        self.load_model.is_none()
            && self.transform.is_none()
            && self.score.is_none()
            && self.post_process.is_none()
    }
}

impl fmt::Debug for HookSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookSet")
            .field("load_model", &self.load_model.is_some())
            .field("transform", &self.transform.is_some())
            .field("score", &self.score.is_some())
            .field("post_process", &self.post_process.is_some())
            .finish()
    }
}

fn hook_err(hook: HookStage) -> impl FnOnce(anyhow::Error) -> ScoreError {
    move |source| ScoreError::HookExecution { hook, source }
}

/// A base predictor decorated with the hook pipeline.
///
/// Label queries delegate to the base predictor; only the predict path is
/// decorated.
pub struct HookedPredictor {
    base: Box<dyn Predictor>,
    hooks: HookSet,
}

impl HookedPredictor {
    pub fn new(base: Box<dyn Predictor>, hooks: HookSet) -> Self {
        Self { base, hooks }
    }
}

impl Predictor for HookedPredictor {
    fn predict(&mut self, frame: &Frame) -> Result<Predictions, ScoreError> {
        let transformed;
        let frame = match &self.hooks.transform {
            Some(transform) => {
                transformed = transform(frame.clone()).map_err(hook_err(HookStage::Transform))?;
                &transformed
            }
            None => frame,
        };

        // A supplied score hook fully replaces the base predict step.
        let predictions = match &self.hooks.score {
            Some(score) => score(frame).map_err(hook_err(HookStage::Score))?,
            None => self.base.predict(frame)?,
        };

        match &self.hooks.post_process {
            Some(post) => post(predictions).map_err(hook_err(HookStage::PostProcess)),
            None => Ok(predictions),
        }
    }

    fn class_labels(&self) -> Option<Vec<String>> {
        self.base.class_labels()
    }

    fn label_origin(&self) -> LabelOrigin {
        self.base.label_origin()
    }

    fn predict_unstructured(&mut self, data: &[u8]) -> Result<Vec<u8>, ScoreError> {
        self.base.predict_unstructured(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ConstPredictor(f64);

    impl Predictor for ConstPredictor {
        fn predict(&mut self, frame: &Frame) -> Result<Predictions, ScoreError> {
            Ok(Predictions::Regression(vec![self.0; frame.len()]))
        }

        fn class_labels(&self) -> Option<Vec<String>> {
            Some(vec!["yes".into(), "no".into()])
        }

        fn label_origin(&self) -> LabelOrigin {
            LabelOrigin::Model("sklearn")
        }
    }

    fn frame(rows: usize) -> Frame {
        Frame {
            header: vec!["x".into()],
            rows: (0..rows).map(|i| vec![i.to_string()]).collect(),
        }
    }

    #[test]
    fn no_hooks_is_a_passthrough() {
        let mut p = HookedPredictor::new(Box::new(ConstPredictor(7.0)), HookSet::default());
        let preds = p.predict(&frame(3)).unwrap();
        assert_eq!(preds, Predictions::Regression(vec![7.0; 3]));
    }

    #[test]
    fn hooks_run_in_fixed_order_once_per_call() {
        let trace = Arc::new(std::sync::Mutex::new(Vec::new()));

        let t = trace.clone();
        let transform: TransformHook = Box::new(move |f| {
            t.lock().unwrap().push("transform");
            Ok(f)
        });
        let t = trace.clone();
        let score: ScoreHook = Box::new(move |f| {
            t.lock().unwrap().push("score");
            Ok(Predictions::Regression(vec![1.0; f.len()]))
        });
        let t = trace.clone();
        let post: PostProcessHook = Box::new(move |p| {
            t.lock().unwrap().push("post_process");
            Ok(p)
        });

        let hooks = HookSet {
            load_model: None,
            transform: Some(transform),
            score: Some(score),
            post_process: Some(post),
        };
        let mut p = HookedPredictor::new(Box::new(ConstPredictor(0.0)), hooks);
        p.predict(&frame(2)).unwrap();

        assert_eq!(
            *trace.lock().unwrap(),
            vec!["transform", "score", "post_process"]
        );
    }

    #[test]
    fn score_hook_replaces_base_predict() {
        let base_called = Arc::new(AtomicUsize::new(0));

        struct Counting(Arc<AtomicUsize>);
        impl Predictor for Counting {
            fn predict(&mut self, frame: &Frame) -> Result<Predictions, ScoreError> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(Predictions::Regression(vec![0.0; frame.len()]))
            }
        }

        let hooks = HookSet {
            score: Some(Box::new(|f| Ok(Predictions::Regression(vec![9.0; f.len()])))),
            ..Default::default()
        };
        let mut p = HookedPredictor::new(Box::new(Counting(base_called.clone())), hooks);
        let preds = p.predict(&frame(2)).unwrap();

        assert_eq!(preds, Predictions::Regression(vec![9.0, 9.0]));
        assert_eq!(base_called.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn transform_output_feeds_the_score_step() {
        let hooks = HookSet {
            transform: Some(Box::new(|mut f| {
                f.rows.push(vec!["extra".into()]);
                Ok(f)
            })),
            ..Default::default()
        };
        let mut p = HookedPredictor::new(Box::new(ConstPredictor(1.0)), hooks);
        let preds = p.predict(&frame(2)).unwrap();
        assert_eq!(preds.len(), 3);
    }

    #[test]
    fn failing_hook_surfaces_its_name() {
        let hooks = HookSet {
            post_process: Some(Box::new(|_| anyhow::bail!("bad output"))),
            ..Default::default()
        };
        let mut p = HookedPredictor::new(Box::new(ConstPredictor(0.0)), hooks);
        let err = p.predict(&frame(1)).unwrap_err();

        match err {
            ScoreError::HookExecution { hook, .. } => assert_eq!(hook, HookStage::PostProcess),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn failing_transform_aborts_before_scoring() {
        let scored = Arc::new(AtomicUsize::new(0));
        let s = scored.clone();
        let hooks = HookSet {
            transform: Some(Box::new(|_| anyhow::bail!("bad input"))),
            score: Some(Box::new(move |f| {
                s.fetch_add(1, Ordering::SeqCst);
                Ok(Predictions::Regression(vec![0.0; f.len()]))
            })),
            ..Default::default()
        };
        let mut p = HookedPredictor::new(Box::new(ConstPredictor(0.0)), hooks);
        let err = p.predict(&frame(1)).unwrap_err();

        assert!(matches!(
            err,
            ScoreError::HookExecution {
                hook: HookStage::Transform,
                ..
            }
        ));
        assert_eq!(scored.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn label_queries_delegate_to_base() {
        let p = HookedPredictor::new(Box::new(ConstPredictor(0.0)), HookSet::default());
        assert_eq!(p.class_labels(), Some(vec!["yes".into(), "no".into()]));
        assert_eq!(p.label_origin(), LabelOrigin::Model("sklearn"));
    }

    #[test]
    fn hook_stage_names_are_the_contract_strings() {
        let names: Vec<&str> = HookStage::ALL.iter().map(|h| h.as_str()).collect();
        assert_eq!(names, vec!["load_model", "transform", "score", "post_process"]);
    }
}
