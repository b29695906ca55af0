// ABOUTME: Error types for source compilation and environment lookups

use thiserror::Error;

/// Errors raised while compiling source text or resolving names against an
/// [`crate::Environment`].
///
/// Evaluation-time anomalies (division by zero, all-`Undefined` fold
/// arguments) are never represented here — they resolve silently to
/// [`crate::Scalar::Undefined`]. `LkitError` only covers the things a host
/// needs to react to before it can evaluate at all: bad source text and
/// unresolved names.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LkitError {
    /// Source text does not match the grammar: an unbalanced paren, a
    /// missing head token, a malformed `set`, or an unparsable literal.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// A name used in head position is not registered in the function
    /// table.
    #[error("unknown function: {0}")]
    Lookup(String),

    /// Reserved for node-allocation failure. Never constructed by this
    /// implementation; kept so the type matches the source error taxonomy.
    #[error("allocation failure")]
    Alloc,
}

pub type Result<T> = std::result::Result<T, LkitError>;
