//! Helpers over the JSON value model.
use serde_json::Value;

/// The container kind materialized by [`crate::fix_path`] at the final
/// pointer segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leaf {
    Object,
    Array,
}

impl Leaf {
    /// The leaf kind hinted by an existing value: objects stay objects,
    /// everything else materializes as an array.
    pub fn of(value: &Value) -> Self {
        if value.is_object() { Leaf::Object } else { Leaf::Array }
    }
}

/// True for `null`, `{}` and `[]` — the values the engine treats as
/// "no contribution".
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}

/// The element view used by the streaming functions: array elements, object
/// field values, or the scalar itself. Empty values stream nothing.
pub fn values(value: &Value) -> Vec<Value> {
    if is_empty(value) {
        return Vec::new();
    }
    match value {
        Value::Array(items) => items.clone(),
        Value::Object(fields) => fields.values().cloned().collect(),
        other => vec![other.clone()],
    }
}
