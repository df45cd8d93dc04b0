//! Orchestrates an ordered list of transformations over one source document.
use crate::script::{EngineHolder, EvaluatorFactory};
use crate::transformation::Transformation;
use serde_json::{Map, Value};
use std::sync::Arc;

/// The transformer: applies its rules in list order, each consuming the
/// previous rule's output as its working result document.
pub struct Transformer {
    transformations: Vec<Transformation>,
    evaluator: Option<Arc<EvaluatorFactory>>,
}

impl std::fmt::Debug for Transformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transformer")
            .field("transformations", &self.transformations)
            .finish_non_exhaustive()
    }
}

impl Transformer {
    pub(crate) fn new(
        transformations: Vec<Transformation>,
        evaluator: Option<Arc<EvaluatorFactory>>,
    ) -> Self {
        Self { transformations, evaluator }
    }

    /// Transforms `source`, starting from an empty result document. One
    /// script-evaluator handle is created per call and shared by all rules,
    /// so concurrent calls never share evaluator state.
    pub fn transform(&self, source: &Value) -> Value {
        let engine = EngineHolder::new(self.evaluator.as_deref());
        let mut result = Value::Object(Map::new());
        for transformation in &self.transformations {
            result = transformation.transform(source, &result, &engine);
        }
        result
    }
}
