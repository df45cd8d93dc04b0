//! One declarative rule and the recursive `[i]` broadcast algorithm.
use crate::ast::Expression;
use crate::context::TransformationCtx;
use crate::error::TransformError;
use crate::functions::FunctionRegistry;
use crate::parser::parse_expression;
use crate::script::EngineHolder;
use remold_pointer::{
    Leaf, WILDCARD, fix_path, get_value, is_empty, replace, split_on_wildcard,
};
use serde_json::{Map, Value, json};

/// Runs a rule's expression list in sequence. Each expression consumes the
/// previous expression's output as its working result; with
/// `useResultAsSource` set, also as its working source (read-after-write
/// within one rule). An empty list is a bare copy: the source value passes
/// through. Public so wrapper functions can delegate.
pub fn execute_expressions(
    ctx: &TransformationCtx,
    source: &Value,
    result: &Value,
    expressions: &[Expression],
) -> Value {
    if expressions.is_empty() {
        return source.clone();
    }
    let mut running = result.clone();
    for expression in expressions {
        let step_source = if ctx.use_result_as_source() { running.clone() } else { source.clone() };
        running = execute_expression(ctx, &step_source, &running, expression);
    }
    running
}

fn execute_expression(
    ctx: &TransformationCtx,
    source: &Value,
    result: &Value,
    expression: &Expression,
) -> Value {
    match expression {
        Expression::Literal(text) => Value::String(text.clone()),
        Expression::Call { name, arg } => match ctx.functions().get(name) {
            Some(func) => func(ctx, source, result, arg),
            None => {
                log::error!("function \"{}\" not found", name);
                result.clone()
            }
        },
        Expression::Empty => result.clone(),
    }
}

/// One source-to-result mapping rule. Built once from a rule definition,
/// immutable thereafter; each invocation observes the document state left by
/// the preceding rules.
pub struct Transformation {
    append: bool,
    use_result_as_source: bool,
    source_pointer: String,
    result_pointer: String,
    raw_expressions: Vec<String>,
    expressions: Vec<Expression>,
    functions: FunctionRegistry,
}

impl std::fmt::Debug for Transformation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transformation")
            .field("append", &self.append)
            .field("use_result_as_source", &self.use_result_as_source)
            .field("source_pointer", &self.source_pointer)
            .field("result_pointer", &self.result_pointer)
            .field("raw_expressions", &self.raw_expressions)
            .field("expressions", &self.expressions)
            .finish_non_exhaustive()
    }
}

impl Transformation {
    /// Builds a rule, parsing its expressions up front. Malformed
    /// expressions and unknown function names fail here, at engine-build
    /// time.
    pub fn new(
        append: bool,
        use_result_as_source: bool,
        source_pointer: String,
        result_pointer: String,
        raw_expressions: Vec<String>,
        functions: FunctionRegistry,
    ) -> Result<Self, TransformError> {
        let expressions = raw_expressions
            .iter()
            .map(|raw| {
                let expression = parse_expression(raw)?;
                if let Expression::Call { name, .. } = &expression {
                    if !functions.contains(name) {
                        return Err(TransformError::UnknownFunction {
                            name: name.clone(),
                            expression: raw.clone(),
                        });
                    }
                }
                Ok(expression)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            append,
            use_result_as_source,
            source_pointer,
            result_pointer,
            raw_expressions,
            expressions,
            functions,
        })
    }

    pub fn use_result_as_source(&self) -> bool {
        self.use_result_as_source
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// A JSON snapshot of the rule definition, for logging wrappers.
    pub fn to_json(&self) -> Value {
        json!({
            "append": self.append,
            "useResultAsSource": self.use_result_as_source,
            "sourcePointer": self.source_pointer,
            "resultPointer": self.result_pointer,
            "expressions": self.raw_expressions,
        })
    }

    /// Applies the rule to the running result. Never fails: data problems
    /// degrade to a no-op for this rule.
    pub fn transform(&self, source: &Value, result: &Value, engine: &EngineHolder) -> Value {
        let source_or_result = if self.use_result_as_source { result } else { source };
        let ctx = TransformationCtx::new(
            source_or_result,
            result,
            source_or_result.clone(),
            result.clone(),
            self,
            engine,
        );
        if !self.source_pointer.contains(WILDCARD) {
            return self.do_transform(&ctx, &self.source_pointer, &self.result_pointer);
        }
        let source_pointers = split_on_wildcard(&self.source_pointer);
        let mut result_pointers = split_on_wildcard(&self.result_pointer);
        // A trailing [i] on the result side addresses the element slots of
        // the last named array, not a further nesting level; values produced
        // below it distribute into that array directly.
        if result_pointers.len() > 1 && result_pointers.last() == Some(&"") {
            result_pointers.pop();
        }
        self.broadcast(&ctx, &source_pointers, &result_pointers, false, engine)
    }

    /// The recursive fan-out. Each `[i]` boundary on the source side
    /// descends one array level; result-side boundaries distribute the
    /// produced values. Once the result side runs out of boundaries,
    /// `flatten` turns on and nested arrays are spliced into the parent
    /// level instead of nested.
    fn broadcast(
        &self,
        ctx: &TransformationCtx,
        source_pointers: &[&str],
        result_pointers: &[&str],
        flatten: bool,
        engine: &EngineHolder,
    ) -> Value {
        if source_pointers.len() == 1 {
            return self.do_transform(ctx, source_pointers[0], &result_pointers.join(WILDCARD));
        }
        let Some(source_value) = get_value(ctx.local_source(), source_pointers[0]) else {
            return ctx.local_result().clone();
        };
        if source_value.is_null() {
            return ctx.local_result().clone();
        }
        let root = result_pointers.first().copied().unwrap_or("");
        let fixed_result = fix_path(ctx.local_result(), Leaf::Array, root);
        let source_array = match source_value {
            Value::Array(items) => items,
            // Broadcasting over a non-array degenerates to one iteration.
            other => vec![other],
        };

        let remaining_source = &source_pointers[1..];
        let remaining_result =
            if result_pointers.is_empty() { &[][..] } else { &result_pointers[1..] };
        let do_flatten = flatten || result_pointers.len() == 1;
        let mut result = get_value(&fixed_result, root).unwrap_or(Value::Null);
        let mut flattened_merge_idx = 0;
        for (i, element) in source_array.iter().enumerate() {
            let result_array = match result {
                Value::Array(items) => items,
                _ => Vec::new(),
            };
            // Merge mode reuses the element already at this index; append
            // mode always starts from scratch.
            let result_object = if !self.append && result_array.len() > i {
                result_array[i].clone()
            } else {
                Value::Object(Map::new())
            };
            let local_ctx = TransformationCtx::new(
                ctx.global_source(),
                ctx.global_result(),
                element.clone(),
                result_object,
                self,
                engine,
            );
            let transformed =
                self.broadcast(&local_ctx, remaining_source, remaining_result, do_flatten, engine);
            result = match transformed {
                Value::Array(produced) if do_flatten && !self.append => {
                    // Splice into the parent array, continuing where the
                    // previous iteration left off.
                    let merged = merge_arrays(&produced, &result_array, flattened_merge_idx);
                    flattened_merge_idx += produced.len();
                    Value::Array(merged)
                }
                transformed if !self.append && !transformed.is_array() && result_array.len() > i => {
                    let mut items = result_array;
                    items[i] = transformed;
                    Value::Array(items)
                }
                Value::Array(produced) if do_flatten => {
                    let mut items = result_array;
                    items.extend(produced);
                    Value::Array(items)
                }
                transformed => {
                    let mut items = result_array;
                    items.push(transformed);
                    Value::Array(items)
                }
            };
        }
        replace(&fixed_result, root, result)
    }

    /// Base case: one source segment left. Composes the produced value into
    /// the result by append or merge.
    fn do_transform(
        &self,
        ctx: &TransformationCtx,
        source_pointer: &str,
        result_pointer: &str,
    ) -> Value {
        let Some(source_value) = get_value(ctx.local_source(), source_pointer) else {
            return ctx.local_result().clone();
        };
        if source_value.is_null() {
            return ctx.local_result().clone();
        }
        if self.expressions.is_empty() && is_empty(&source_value) {
            // A bare copy of an empty value contributes nothing.
            return ctx.local_result().clone();
        }
        if self.append {
            let fixed_result = fix_path(ctx.local_result(), Leaf::Array, result_pointer);
            let produced =
                execute_expressions(ctx, &source_value, &Value::Object(Map::new()), &self.expressions);
            match get_value(&fixed_result, result_pointer) {
                Some(Value::Array(mut items)) => {
                    items.push(produced);
                    replace(&fixed_result, result_pointer, Value::Array(items))
                }
                _ => produced,
            }
        } else {
            if self.expressions.is_empty() && source_value.is_array() {
                if let Some(existing) = get_value(ctx.local_result(), result_pointer) {
                    if existing.is_object() && !is_empty(&existing) {
                        log::error!(
                            "cannot merge array at \"{}\" into object at \"{}\", rule skipped",
                            source_pointer,
                            result_pointer
                        );
                        return ctx.local_result().clone();
                    }
                }
            }
            let fixed_result =
                fix_path(ctx.local_result(), Leaf::of(&source_value), result_pointer);
            let current = get_value(&fixed_result, result_pointer).unwrap_or(Value::Null);
            let produced = execute_expressions(ctx, &source_value, &current, &self.expressions);
            if is_empty(&fixed_result) {
                return produced;
            }
            replace(&fixed_result, result_pointer, produced)
        }
    }
}

/// Splices `source` into `result` starting at `start_idx`: overlapping slots
/// merge pairwise, the rest append.
fn merge_arrays(source: &[Value], result: &[Value], start_idx: usize) -> Vec<Value> {
    let mut merged = result.to_vec();
    for (i, incoming) in source.iter().enumerate() {
        if result.len() > start_idx + i {
            merged[start_idx + i] = merge_value(incoming, &result[start_idx + i]);
        } else {
            merged.push(incoming.clone());
        }
    }
    merged
}

/// Pairwise merge at one slot: arrays recurse positionally, objects
/// shallow-merge with the incoming side winning, any other combination keeps
/// the existing value.
fn merge_value(source: &Value, result: &Value) -> Value {
    match (source, result) {
        (Value::Array(incoming), Value::Array(existing)) => {
            Value::Array(merge_arrays(incoming, existing, 0))
        }
        (Value::Object(incoming), Value::Object(existing)) => {
            let mut merged = existing.clone();
            for (key, value) in incoming {
                merged.insert(key.clone(), value.clone());
            }
            Value::Object(merged)
        }
        _ => result.clone(),
    }
}
