//! # remold
//!
//! A declarative, rule-based JSON-to-JSON transformation engine.
//!
//! A rule set is itself a JSON document: an ordered list of transformations,
//! each naming a source and a result location with an extended JSON Pointer
//! syntax plus a sequence of value-producing expressions. The engine folds a
//! source document through all rules in order into an accumulating result.
//!
//! ```
//! use remold::TransformerFactory;
//! use serde_json::json;
//!
//! let transformer = TransformerFactory::new()
//!     .from_json_str(r#"{
//!         "transformations": [
//!             { "sourcePointer": "/items[i]/name", "resultPointer": "/names[i]", "append": true }
//!         ]
//!     }"#)
//!     .unwrap();
//!
//! let source = json!({ "items": [{ "name": "a" }, { "name": "b" }] });
//! assert_eq!(transformer.transform(&source), json!({ "names": ["a", "b"] }));
//! ```
//!
//! The `[i]` marker broadcasts a rule over array elements; `append` selects
//! append composition over merge-by-index. The `script`, `filter`, `map` and
//! `reduce` built-ins delegate to a caller-supplied scripting runtime behind
//! the [`ScriptEvaluator`] seam.

pub use remold_engine::{
    EngineHolder, ExprFunction, Expression, FunctionRegistry, ScriptError, ScriptEvaluator,
    TransformError, Transformation, TransformationCtx, Transformer, TransformerFactory,
    execute_expressions, parse_expression,
};
pub use remold_pointer::{
    Leaf, add, contains_value, fix_path, get_value, is_empty, remove, replace,
    split_on_wildcard, values,
};
