//! Error types for readypath.
//!
//! All errors are strongly typed using thiserror. Parse errors are
//! construction-time and fatal to the condition instance; evaluation and watch
//! errors are per-call and leave observer state untouched.

use thiserror::Error;

use crate::document::Document;

/// Errors rejecting a surface expression at parse time.
///
/// A parse error means no [`Parsed`](crate::path::Parsed) value is produced at
/// all; there is nothing to retry.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("expression must be non-empty")]
    Empty,

    #[error("expression must begin with jsonpath=")]
    MissingPrefix,

    #[error("omit shell quotes around the expression")]
    ShellQuotes,

    #[error("expression {expr} has unbalanced braces")]
    UnbalancedBraces { expr: String },

    #[error("{path}= requires a value")]
    MissingValue { path: String },

    #[error("format should be {{.path}}=value or {{.path}}")]
    AmbiguousSeparator,

    #[error("unrecognized character {ch:?} in expression at position {pos}")]
    UnrecognizedCharacter { ch: char, pos: usize },
}

/// Errors raised while evaluating a parsed expression against a document.
#[derive(Debug, Error, PartialEq)]
pub enum EvalError {
    #[error("{path} has a non-primitive value")]
    NonPrimitiveValue { path: String },
}

/// Errors raised on the watch-event path.
#[derive(Debug, Error, PartialEq)]
pub enum WatchError {
    /// An `Error`-kind event's payload, surfaced verbatim. The snapshot is
    /// not mutated.
    #[error("watch source reported an error: {payload}")]
    Upstream { payload: Document },

    #[error("event source disconnected")]
    Disconnected,

    #[error("timed out after {duration_ms}ms waiting for an event")]
    Timeout { duration_ms: u64 },
}

/// Top-level error type for readypath.
#[derive(Debug, Error, PartialEq)]
pub enum ReadyError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Watch(#[from] WatchError),
}

impl ReadyError {
    /// Returns true if this is a construction-time parse error.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    /// Returns true if this is a per-call evaluation error.
    #[must_use]
    pub const fn is_eval(&self) -> bool {
        matches!(self, Self::Eval(_))
    }

    /// Returns true if this error originated from the watch feed.
    #[must_use]
    pub const fn is_watch(&self) -> bool {
        matches!(self, Self::Watch(_))
    }
}

/// Result type alias for readypath operations.
pub type ReadyResult<T> = Result<T, ReadyError>;
