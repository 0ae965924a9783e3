//! The restricted path-expression language.
//!
//! Surface syntax is `jsonpath={<path-expr>}[=<value>]`: field selectors,
//! integer or wildcard array indices, and at most one equality filter
//! predicate per segment. Unsupported constructs are rejected at parse time
//! rather than silently mis-evaluated.

/// Evaluation of parsed expressions against documents.
pub mod matcher;
/// Surface-syntax parsing.
pub mod parser;
/// The compiled selector grammar.
pub mod selector;

pub use matcher::MatchResult;
pub use parser::{parse, Parsed, EXPRESSION_PREFIX};
pub use selector::Segment;
