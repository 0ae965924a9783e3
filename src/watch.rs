//! Watch events and the upstream feed boundary.
//!
//! Events for one tracked object arrive as a single well-defined sequence,
//! never reordered here. The channel pair models the feed at its interface
//! boundary; the transport that produces it and the orchestration loop that
//! drains it are external collaborators.

use std::time::Duration;

use chrono::{DateTime, Utc};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::WatchError;

/// The kind of state change an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Added,
    Modified,
    Deleted,
    /// The upstream source reported a failure; the payload describes it.
    Error,
}

/// One state-change event for a tracked object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchEvent {
    /// What happened.
    pub kind: EventKind,
    /// The object's state carried by the event. For `Error` events this is
    /// the failure payload, not an object state.
    pub object: Document,
    /// When this event was observed by the feed.
    pub observed_at: DateTime<Utc>,
}

impl WatchEvent {
    /// Creates an event observed now.
    #[must_use]
    pub fn new(kind: EventKind, object: Document) -> Self {
        Self {
            kind,
            object,
            observed_at: Utc::now(),
        }
    }

    /// An `Added` event carrying the object's initial state.
    #[must_use]
    pub fn added(object: Document) -> Self {
        Self::new(EventKind::Added, object)
    }

    /// A `Modified` event carrying the object's updated state.
    #[must_use]
    pub fn modified(object: Document) -> Self {
        Self::new(EventKind::Modified, object)
    }

    /// A `Deleted` event carrying the object's final state.
    #[must_use]
    pub fn deleted(object: Document) -> Self {
        Self::new(EventKind::Deleted, object)
    }

    /// An `Error` event carrying the upstream failure payload.
    #[must_use]
    pub fn error(payload: Document) -> Self {
        Self::new(EventKind::Error, payload)
    }
}

/// Creates a bounded feed for one tracked object.
///
/// The producer side drains the upstream watch and sends events in arrival
/// order; the consumer side feeds them into an observer.
#[must_use]
pub fn channel(capacity: usize) -> (EventSender, EventSource) {
    let (tx, rx) = crossbeam_channel::bounded(capacity);
    (EventSender { tx }, EventSource { rx })
}

/// Producer half of an event feed.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<WatchEvent>,
}

impl EventSender {
    /// Sends one event, blocking while the feed is full.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Disconnected`] when the consumer side is gone.
    pub fn send(&self, event: WatchEvent) -> Result<(), WatchError> {
        self.tx.send(event).map_err(|_| WatchError::Disconnected)
    }
}

/// Consumer half of an event feed.
#[derive(Debug)]
pub struct EventSource {
    rx: Receiver<WatchEvent>,
}

impl EventSource {
    /// Receives the next event (blocking).
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Disconnected`] when the producer side is gone.
    pub fn recv(&self) -> Result<WatchEvent, WatchError> {
        self.rx.recv().map_err(|_| WatchError::Disconnected)
    }

    /// Receives the next event with a timeout.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Timeout`] when no event arrives in time, or
    /// [`WatchError::Disconnected`] when the producer side is gone.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<WatchEvent, WatchError> {
        self.rx.recv_timeout(timeout).map_err(|err| match err {
            RecvTimeoutError::Timeout => WatchError::Timeout {
                duration_ms: timeout.as_millis().min(u128::from(u64::MAX)) as u64,
            },
            RecvTimeoutError::Disconnected => WatchError::Disconnected,
        })
    }
}
