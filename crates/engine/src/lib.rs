//! The rule evaluation engine.
//!
//! A transformer folds a source document through an ordered list of rules
//! into an accumulating result document. Each rule names a source and a
//! result location with an extended JSON Pointer (the `[i]` marker
//! broadcasts over array elements) and carries an ordered list of
//! value-producing expressions: string literals, bare copies, or
//! `name(argument)` calls dispatched through a [`FunctionRegistry`].
//!
//! The `script`, `filter`, `map` and `reduce` built-ins delegate to an
//! external scripting runtime behind the [`ScriptEvaluator`] seam; no
//! runtime is bundled.

pub mod ast;
pub mod context;
pub mod error;
pub mod factory;
pub mod functions;
mod imports;
mod parser;
pub mod script;
pub mod transformation;
pub mod transformer;

// --- Public API ---
pub use ast::Expression;
pub use context::TransformationCtx;
pub use error::{ScriptError, TransformError};
pub use factory::TransformerFactory;
pub use functions::{ExprFunction, FunctionRegistry};
pub use parser::parse_expression;
pub use script::{EngineHolder, ScriptEvaluator};
pub use transformation::{Transformation, execute_expressions};
pub use transformer::Transformer;
