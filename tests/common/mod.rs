//! Shared test support: a canned in-process script evaluator.
use remold::{ScriptError, ScriptEvaluator};
use serde_json::{Value, json};
use std::collections::HashMap;

/// A fake scripting runtime understanding a fixed set of scripts, enough to
/// exercise the evaluator seam without bundling a real runtime. Bindings
/// persist across `evaluate` calls, like a real engine scope.
#[derive(Default)]
pub struct FakeEvaluator {
    vars: HashMap<String, Value>,
}

impl FakeEvaluator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScriptEvaluator for FakeEvaluator {
    fn bind(&mut self, name: &str, value: &Value) {
        self.vars.insert(name.to_string(), value.clone());
    }

    fn evaluate(&mut self, script: &str) -> Result<(), ScriptError> {
        let x = self.vars.get("x").cloned().unwrap_or(Value::Null);
        let script = script.trim().trim_end_matches(';').trim_end();
        let produced = match script {
            "res = x" => x,
            "res = x * 2" => x.as_i64().map(|n| json!(n * 2)).unwrap_or(Value::Null),
            "res = x > 2" => json!(x.as_i64().is_some_and(|n| n > 2)),
            "res = acc + x" => {
                let acc = self.vars.get("res").and_then(Value::as_i64).unwrap_or(0);
                json!(acc + x.as_i64().unwrap_or(0))
            }
            "doubled = x * 2; res = doubled" => {
                x.as_i64().map(|n| json!(n * 2)).unwrap_or(Value::Null)
            }
            other => return Err(ScriptError::Eval(format!("unsupported script: {}", other))),
        };
        self.vars.insert("res".to_string(), produced);
        Ok(())
    }

    fn read(&mut self, name: &str) -> Option<Value> {
        self.vars.get(name).cloned().filter(|v| !v.is_null())
    }
}
