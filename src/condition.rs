//! Readiness conditions: the capability composing expression matching with
//! event observation.
//!
//! A condition is driven externally: the orchestration loop feeds events into
//! [`Satisfier::observe`] and polls [`Satisfier::satisfied`] until it returns
//! true, an error it treats as unrecoverable, or its own timeout fires. The
//! condition itself holds no timer and never self-terminates.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};

use crate::document::Document;
use crate::error::{ReadyResult, WatchError};
use crate::observer::ObjectObserver;
use crate::path::{MatchResult, Parsed};
use crate::watch::WatchEvent;

/// A single-line, human-readable status message emitted per evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// The message text, e.g. `Waiting for {.status.phase}=Running`.
    pub text: String,
    /// When the message was emitted.
    pub at: DateTime<Utc>,
}

impl StatusMessage {
    /// Creates a message stamped now.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            at: Utc::now(),
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Receives status messages as a side effect of evaluation.
pub trait StatusSink: Send + Sync {
    /// Accepts one status message.
    fn log_status(&self, message: StatusMessage);
}

/// Discards all status messages.
#[derive(Debug, Default)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn log_status(&self, _message: StatusMessage) {}
}

/// Retains status messages in memory, for tests and introspection.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<StatusMessage>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every message logged so far, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<StatusMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StatusSink for MemorySink {
    fn log_status(&self, message: StatusMessage) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
    }
}

/// The capability set exposed to a wait-orchestration loop.
///
/// The path-expression condition is one implementer among a family; other
/// condition kinds share the same surface without touching the matcher or
/// observer.
pub trait Satisfier: Send + Sync {
    /// Evaluates the condition against the current snapshot, emitting a
    /// status message as a side effect.
    ///
    /// # Errors
    ///
    /// Evaluation errors are reported once per call; the caller decides
    /// whether to retry on the next event.
    fn satisfied(&self) -> ReadyResult<bool>;

    /// Applies one watch event to the tracked state.
    ///
    /// # Errors
    ///
    /// An `Error`-kind event surfaces its payload.
    fn observe(&self, event: WatchEvent) -> Result<(), WatchError>;

    /// Replays observed history in arrival order; the consumer returns
    /// `false` to stop early.
    fn range(&self, consume: &mut dyn FnMut(&WatchEvent) -> bool);

    /// The current snapshot, if anything has been observed.
    fn object(&self) -> Option<Document>;
}

/// Waits for the observed object to match a path expression.
pub struct JsonPathCondition {
    observer: ObjectObserver,
    expr: Parsed,
    sink: Arc<dyn StatusSink>,
}

impl JsonPathCondition {
    /// Creates a condition from an already-parsed expression.
    #[must_use]
    pub fn new(expr: Parsed, sink: Arc<dyn StatusSink>) -> Self {
        Self {
            observer: ObjectObserver::new(),
            expr,
            sink,
        }
    }

    /// Creates a condition from a surface expression string.
    ///
    /// # Errors
    ///
    /// A malformed expression prevents construction entirely.
    pub fn from_expression(expr: &str, sink: Arc<dyn StatusSink>) -> ReadyResult<Self> {
        Ok(Self::new(crate::path::parse(expr)?, sink))
    }

    /// Creates a condition seeded with an already-known object state.
    #[must_use]
    pub fn with_initial(expr: Parsed, object: Document, sink: Arc<dyn StatusSink>) -> Self {
        Self {
            observer: ObjectObserver::with_initial(object),
            expr,
            sink,
        }
    }

    /// The expression this condition waits on.
    #[must_use]
    pub fn expression(&self) -> &Parsed {
        &self.expr
    }

    /// Whether the tracked object has been deleted (tombstoned).
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.observer.is_deleted()
    }
}

impl fmt::Debug for JsonPathCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonPathCondition")
            .field("expr", &self.expr)
            .field("observer", &self.observer)
            .finish_non_exhaustive()
    }
}

impl Satisfier for JsonPathCondition {
    fn satisfied(&self) -> ReadyResult<bool> {
        let mut message = format!("Waiting for {}", self.expr);

        let result = match self.observer.object() {
            // Nothing observed yet: not satisfiable, not an error.
            None => Ok(MatchResult {
                matched: false,
                found: String::new(),
            }),
            Some(doc) => self.expr.matches(&doc),
        };

        match result {
            Ok(outcome) => {
                if !outcome.found.is_empty() {
                    message = format!("{message} (found {:?})", outcome.found);
                }
                self.sink.log_status(StatusMessage::new(message));
                Ok(outcome.matched)
            }
            Err(err) => {
                self.sink.log_status(StatusMessage::new(message));
                Err(err.into())
            }
        }
    }

    fn observe(&self, event: WatchEvent) -> Result<(), WatchError> {
        self.observer.observe(event)
    }

    fn range(&self, consume: &mut dyn FnMut(&WatchEvent) -> bool) {
        self.observer.range(consume);
    }

    fn object(&self) -> Option<Document> {
        self.observer.object()
    }
}
