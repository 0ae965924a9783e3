//! # readypath - declarative readiness for watched objects
//!
//! readypath evaluates whether a live, asynchronously-changing structured
//! object satisfies a user-provided path expression. A restricted JSONPath
//! dialect is parsed once into a [`path::Parsed`] expression; an ordered
//! stream of [`watch::WatchEvent`]s folds into the latest known snapshot; and
//! a [`condition::Satisfier`] answers "is the condition satisfied right now"
//! on demand, cheaply, as new events arrive.
//!
//! ## Core concepts
//!
//! - **Document**: a dynamically-shaped, JSON-like value, the last known
//!   state of a tracked object
//! - **Parsed**: a compiled `jsonpath={.path}[=value]` expression
//! - **ObjectObserver**: the single point of truth for one object's state,
//!   fed by an ordered event stream
//! - **Satisfier**: the capability set exposed to the wait loop
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use readypath::{Document, JsonPathCondition, NullSink, Satisfier, WatchEvent};
//!
//! let cond = JsonPathCondition::from_expression(
//!     "jsonpath={.status.phase}=Running",
//!     Arc::new(NullSink),
//! )?;
//!
//! cond.observe(WatchEvent::added(Document::from(serde_json::json!({
//!     "status": {"phase": "Running"},
//! }))))?;
//!
//! assert!(cond.satisfied()?);
//! # Ok::<(), readypath::ReadyError>(())
//! ```
//!
//! Timeout, cancellation, and retry policy belong to the caller: the
//! condition never self-terminates.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod condition;
pub mod document;
pub mod error;
pub mod observer;
pub mod path;
pub mod watch;

// Re-export primary types at crate root for convenience
pub use condition::{JsonPathCondition, MemorySink, NullSink, Satisfier, StatusMessage, StatusSink};
pub use document::Document;
pub use error::{EvalError, ParseError, ReadyError, ReadyResult, WatchError};
pub use observer::ObjectObserver;
pub use path::{parse, MatchResult, Parsed};
pub use watch::{channel, EventKind, EventSender, EventSource, WatchEvent};
