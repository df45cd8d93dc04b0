//! The seam to an external scripting evaluator.
//!
//! The engine never depends on a concrete scripting runtime. A caller wires
//! one in through [`ScriptEvaluator`]; the `script`, `filter`, `map` and
//! `reduce` built-ins push values across this boundary under the `x` binding
//! and read results back from the `res` binding.
use crate::error::ScriptError;
use serde_json::Value;
use std::cell::RefCell;

/// The narrow interface a scripting runtime must provide. Values cross the
/// seam as `serde_json::Value`, so the JSON/native conversion is the
/// identity on the engine side.
pub trait ScriptEvaluator {
    /// Binds `value` under `name` in the evaluator's scope.
    fn bind(&mut self, name: &str, value: &Value);
    /// Runs `script` against the current scope. Evaluator state (including
    /// bindings written by the script) persists across calls.
    fn evaluate(&mut self, script: &str) -> Result<(), ScriptError>;
    /// Reads the binding `name` back out; `None` when unset or null.
    fn read(&mut self, name: &str) -> Option<Value>;
}

/// Builds a fresh evaluator for one `transform` call.
pub type EvaluatorFactory = dyn Fn() -> Box<dyn ScriptEvaluator> + Send + Sync;

/// Holds at most one evaluator for the duration of a single
/// `Transformer::transform` call. The evaluator is created lazily on first
/// use and shared by every rule and recursion level of that call; this is
/// the only shared mutable state in the engine, which is single-threaded by
/// contract.
pub struct EngineHolder<'a> {
    factory: Option<&'a EvaluatorFactory>,
    engine: RefCell<Option<Box<dyn ScriptEvaluator>>>,
}

impl<'a> EngineHolder<'a> {
    pub(crate) fn new(factory: Option<&'a EvaluatorFactory>) -> Self {
        Self { factory, engine: RefCell::new(None) }
    }

    /// Runs `f` against the evaluator, instantiating it on first use.
    /// Returns `None` when no evaluator factory is configured.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut dyn ScriptEvaluator) -> R) -> Option<R> {
        let mut slot = self.engine.borrow_mut();
        if slot.is_none() {
            match self.factory {
                Some(make) => *slot = Some(make()),
                None => {
                    log::warn!("script expression used but no script evaluator is configured");
                    return None;
                }
            }
        }
        slot.as_mut().map(|engine| f(engine.as_mut()))
    }

    /// Clears the `res` binding before a script round-trip.
    pub(crate) fn reset(&self, key: &str) {
        self.with_engine(|engine| engine.bind(key, &Value::Null));
    }

    /// Binds `value` under `key` and evaluates `script`; failures are logged
    /// and degrade to "no value produced".
    pub(crate) fn eval_bound(&self, script: &str, value: &Value, key: &str) {
        self.with_engine(|engine| {
            engine.bind(key, value);
            if let Err(e) = engine.evaluate(script) {
                log::error!("script failed: {}", e);
            }
        });
    }

    /// Reads a binding back out of the evaluator.
    pub(crate) fn read(&self, key: &str) -> Option<Value> {
        self.with_engine(|engine| engine.read(key)).flatten()
    }
}
