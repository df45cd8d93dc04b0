//! Per-recursion-level scope bundle handed to expression functions.
use crate::script::EngineHolder;
use crate::transformation::Transformation;
use serde_json::{Value, json};

/// The context visible to one rule invocation at one recursion depth.
///
/// The global documents are fixed for the whole run and borrowed; the local
/// documents are the sub-values visible after `[i]` descent and are owned by
/// the level that created them, so recursion branches never alias.
pub struct TransformationCtx<'a> {
    global_source: &'a Value,
    global_result: &'a Value,
    local_source: Value,
    local_result: Value,
    transformation: &'a Transformation,
    engine: &'a EngineHolder<'a>,
}

impl<'a> TransformationCtx<'a> {
    pub(crate) fn new(
        global_source: &'a Value,
        global_result: &'a Value,
        local_source: Value,
        local_result: Value,
        transformation: &'a Transformation,
        engine: &'a EngineHolder<'a>,
    ) -> Self {
        Self { global_source, global_result, local_source, local_result, transformation, engine }
    }

    /// The whole source document of the run.
    pub fn global_source(&self) -> &Value {
        self.global_source
    }

    /// The whole result document as it stood when the owning rule started.
    pub fn global_result(&self) -> &Value {
        self.global_result
    }

    /// The source sub-document at the current recursion depth.
    pub fn local_source(&self) -> &Value {
        &self.local_source
    }

    /// The result sub-document at the current recursion depth.
    pub fn local_result(&self) -> &Value {
        &self.local_result
    }

    /// The function registry of the owning rule.
    pub fn functions(&self) -> &crate::functions::FunctionRegistry {
        self.transformation.functions()
    }

    /// The owning rule's `useResultAsSource` flag.
    pub fn use_result_as_source(&self) -> bool {
        self.transformation.use_result_as_source()
    }

    /// The script evaluator handle of this run.
    pub fn engine(&self) -> &EngineHolder<'a> {
        self.engine
    }

    /// A JSON snapshot of the context, for logging wrappers.
    pub fn to_json(&self) -> Value {
        json!({
            "transformation": self.transformation.to_json(),
            "globalSource": self.global_source,
            "globalResult": self.global_result,
            "localSource": self.local_source,
            "localResult": self.local_result,
        })
    }
}
