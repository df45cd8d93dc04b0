use thiserror::Error;

/// Engine-build-time failures. Malformed rule sets fail fast here; data
/// problems encountered during a transform never surface as errors, they
/// degrade to per-rule no-ops.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("rule set parsing error: {0}")]
    RuleSetParse(#[from] serde_json::Error),

    #[error("expression parse error in '{0}': {1}")]
    ExpressionParse(String, String),

    #[error("unknown function '{name}' in expression '{expression}'")]
    UnknownFunction { name: String, expression: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure inside an external script evaluator. Caught and logged at the
/// seam; never propagated out of a transform.
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("script evaluation failed: {0}")]
    Eval(String),
}
