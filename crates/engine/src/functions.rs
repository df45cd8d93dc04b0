//! Defines the registry and built-in implementations for expression functions.
use crate::context::TransformationCtx;
use remold_pointer::{Leaf, fix_path, get_value, is_empty, remove, replace, values};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// The signature for an expression function: `(context, source, result,
/// argument) -> value`. The argument is the raw text between the call's
/// parentheses.
pub type ExprFunction =
    Arc<dyn Fn(&TransformationCtx, &Value, &Value, &str) -> Value + Send + Sync>;

/// A registry to hold all functions available to rule expressions.
#[derive(Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, ExprFunction>,
}

impl FunctionRegistry {
    /// Creates a new, empty function registry.
    pub fn new() -> Self {
        Self { functions: HashMap::new() }
    }

    /// Registers a function, replacing any previous entry of the same name.
    pub fn register<F>(&mut self, name: &str, func: F)
    where
        F: Fn(&TransformationCtx, &Value, &Value, &str) -> Value + Send + Sync + 'static,
    {
        self.functions.insert(name.to_string(), Arc::new(func));
    }

    /// Finds a function by name.
    pub fn get(&self, name: &str) -> Option<&ExprFunction> {
        self.functions.get(name)
    }

    /// Name-existence test, used for build-time expression validation.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
}

impl Default for FunctionRegistry {
    /// Creates a new registry populated with all built-in functions.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register("copy", copy);
        registry.register("move", move_value);
        registry.register("remove", remove_value);
        registry.register("generateUuid", generate_uuid);
        registry.register("script", script);
        registry.register("filter", filter);
        registry.register("map", map_elements);
        registry.register("reduce", reduce);
        registry
    }
}

/// Splits a `from, to` argument pair; missing parts default to the root
/// pointer.
fn pointer_pair(arg: &str) -> (&str, &str) {
    let mut parts = arg.split(',');
    let from = parts.next().unwrap_or("").trim();
    let to = parts.next().unwrap_or("").trim();
    (from, to)
}

// --- Built-in Function Implementations ---

fn copy(_ctx: &TransformationCtx, source: &Value, result: &Value, arg: &str) -> Value {
    let (from, to) = pointer_pair(arg);
    match get_value(source, from) {
        Some(value) => replace(&fix_path(result, Leaf::Object, to), to, value),
        None => result.clone(),
    }
}

/// Like `copy`, but reads from the in-progress result and removes the source
/// location afterwards.
fn move_value(_ctx: &TransformationCtx, _source: &Value, result: &Value, arg: &str) -> Value {
    let (from, to) = pointer_pair(arg);
    match get_value(result, from) {
        Some(value) => {
            let written = replace(&fix_path(result, Leaf::Object, to), to, value);
            remove(&written, from)
        }
        None => result.clone(),
    }
}

fn remove_value(_ctx: &TransformationCtx, _source: &Value, result: &Value, arg: &str) -> Value {
    remove(result, arg.trim())
}

fn generate_uuid(_ctx: &TransformationCtx, _source: &Value, result: &Value, arg: &str) -> Value {
    let at = arg.trim();
    let id = Value::String(Uuid::new_v4().to_string());
    replace(&fix_path(result, Leaf::Object, at), at, id)
}

/// Evaluates the argument as a script with the source value bound as `x`;
/// the value the script leaves under `res` becomes the expression's result.
fn script(ctx: &TransformationCtx, source: &Value, result: &Value, arg: &str) -> Value {
    if is_empty(source) {
        return result.clone();
    }
    ctx.engine().reset("res");
    ctx.engine().eval_bound(arg, source, "x");
    match ctx.engine().read("res") {
        Some(res) if !is_empty(&res) => res,
        _ => result.clone(),
    }
}

fn filter(ctx: &TransformationCtx, source: &Value, result: &Value, arg: &str) -> Value {
    if is_empty(source) {
        return result.clone();
    }
    ctx.engine().reset("res");
    let kept: Vec<Value> = values(source)
        .into_iter()
        .filter(|element| {
            ctx.engine().eval_bound(arg, element, "x");
            matches!(ctx.engine().read("res"), Some(Value::Bool(true)))
        })
        .collect();
    Value::Array(kept)
}

fn map_elements(ctx: &TransformationCtx, source: &Value, result: &Value, arg: &str) -> Value {
    if is_empty(source) {
        return result.clone();
    }
    ctx.engine().reset("res");
    let mapped: Vec<Value> = values(source)
        .into_iter()
        .map(|element| {
            ctx.engine().eval_bound(arg, &element, "x");
            ctx.engine().read("res").unwrap_or(Value::Null)
        })
        .collect();
    Value::Array(mapped)
}

/// Runs the script once per element; the script threads its own accumulator
/// through the persistent `res` binding, whose final value is the result.
fn reduce(ctx: &TransformationCtx, source: &Value, result: &Value, arg: &str) -> Value {
    if is_empty(source) {
        return result.clone();
    }
    ctx.engine().reset("res");
    for element in values(source) {
        ctx.engine().eval_bound(arg, &element, "x");
    }
    ctx.engine().read("res").unwrap_or(Value::Null)
}
