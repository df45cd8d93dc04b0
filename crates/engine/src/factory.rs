//! Builds transformers from rule-set documents.
use crate::context::TransformationCtx;
use crate::error::TransformError;
use crate::functions::FunctionRegistry;
use crate::imports;
use crate::script::{EvaluatorFactory, ScriptEvaluator};
use crate::transformation::Transformation;
use crate::transformer::Transformer;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct TransformerDef {
    #[serde(default)]
    transformations: Vec<TransformationDef>,
}

/// One rule as it appears in a rule-set document; every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TransformationDef {
    append: bool,
    use_result_as_source: bool,
    source_pointer: String,
    result_pointer: String,
    expressions: Vec<String>,
}

/// Builds [`Transformer`]s from rule-set text or files. Custom expression
/// functions and a script-evaluator factory are registered here, before any
/// rule set is parsed; rule sets referencing unknown functions are rejected
/// at build time.
pub struct TransformerFactory {
    functions: FunctionRegistry,
    evaluator: Option<Arc<EvaluatorFactory>>,
}

impl TransformerFactory {
    /// A factory with the built-in functions and no script evaluator.
    pub fn new() -> Self {
        Self { functions: FunctionRegistry::default(), evaluator: None }
    }

    /// Registers a custom expression function, overriding any built-in of
    /// the same name.
    pub fn with_function<F>(mut self, name: &str, func: F) -> Self
    where
        F: Fn(&TransformationCtx, &Value, &Value, &str) -> Value + Send + Sync + 'static,
    {
        self.functions.register(name, func);
        self
    }

    /// Wires in a scripting runtime for the `script`, `filter`, `map` and
    /// `reduce` built-ins. One evaluator is created per `transform` call.
    pub fn with_evaluator<F>(mut self, make: F) -> Self
    where
        F: Fn() -> Box<dyn ScriptEvaluator> + Send + Sync + 'static,
    {
        self.evaluator = Some(Arc::new(make));
        self
    }

    /// Parses a rule-set document, after import substitution. Malformed
    /// documents and invalid expressions fail fast here.
    pub fn from_json_str(&self, json: &str) -> Result<Transformer, TransformError> {
        let content = imports::preprocess(json);
        let def: TransformerDef = serde_json::from_str(&content)?;
        let transformations = def
            .transformations
            .into_iter()
            .map(|rule| {
                Transformation::new(
                    rule.append,
                    rule.use_result_as_source,
                    rule.source_pointer,
                    rule.result_pointer,
                    rule.expressions,
                    self.functions.clone(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Transformer::new(transformations, self.evaluator.clone()))
    }

    /// Reads and parses a rule-set file.
    pub fn from_file(&self, path: impl AsRef<Path>) -> Result<Transformer, TransformError> {
        let content = fs::read_to_string(path)?;
        self.from_json_str(&content)
    }
}

impl Default for TransformerFactory {
    fn default() -> Self {
        Self::new()
    }
}
