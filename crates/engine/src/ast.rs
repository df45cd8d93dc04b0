//! The parsed form of a rule expression.

/// A single value-producing step within a rule.
///
/// Expressions are classified once, at engine-build time; the `Call` argument
/// stays raw text and is interpreted by the named function itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// A quoted literal; the value is the quoted substring as a JSON string.
    Literal(String),
    /// A `name(argument)` call dispatched through the function registry.
    /// `arg` is the verbatim text between the first `(` and the last `)`.
    Call { name: String, arg: String },
    /// The empty expression; passes the running result through unchanged.
    Empty,
}
