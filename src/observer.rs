//! The single point of truth for one tracked object's last known state.
//!
//! One observer is created per tracked object when a wait begins, fed events
//! for the duration of the wait, and discarded when the wait concludes. A
//! single producer calls [`ObjectObserver::observe`] sequentially while
//! readers poll [`ObjectObserver::object`] and replay history concurrently,
//! so the mutable state sits behind a reader/writer lock.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::document::Document;
use crate::error::WatchError;
use crate::watch::{EventKind, WatchEvent};

#[derive(Debug, Default)]
struct ObservedState {
    current: Option<Document>,
    deleted: bool,
    history: Vec<WatchEvent>,
}

/// Maintains the latest known snapshot of one tracked object, plus an
/// append-only history of the events applied to it.
#[derive(Debug, Default)]
pub struct ObjectObserver {
    state: RwLock<ObservedState>,
}

impl ObjectObserver {
    /// Creates an observer with no state observed yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an observer seeded with an already-known object state.
    ///
    /// The seed is a snapshot, not an event: it does not appear in history.
    #[must_use]
    pub fn with_initial(object: Document) -> Self {
        Self {
            state: RwLock::new(ObservedState {
                current: Some(object),
                deleted: false,
                history: Vec::new(),
            }),
        }
    }

    // State mutations are plain field writes that cannot panic mid-update,
    // so a poisoned lock still holds a consistent snapshot.
    fn read(&self) -> RwLockReadGuard<'_, ObservedState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ObservedState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies one event to the observed state.
    ///
    /// `Added`/`Modified` replace the snapshot; `Deleted` tombstones the
    /// object but leaves the prior snapshot untouched for inspection. All
    /// three append to history.
    ///
    /// # Errors
    ///
    /// An `Error`-kind event surfaces its payload as
    /// [`WatchError::Upstream`]; the snapshot is untouched, though the event
    /// is still recorded in history for replay.
    pub fn observe(&self, event: WatchEvent) -> Result<(), WatchError> {
        let mut state = self.write();
        match event.kind {
            EventKind::Added | EventKind::Modified => {
                state.current = Some(event.object.clone());
                state.deleted = false;
                state.history.push(event);
                Ok(())
            }
            EventKind::Deleted => {
                // The prior snapshot is retained for inspection; only the
                // tombstone changes.
                state.deleted = true;
                state.history.push(event);
                Ok(())
            }
            EventKind::Error => {
                let payload = event.object.clone();
                state.history.push(event);
                Err(WatchError::Upstream { payload })
            }
        }
    }

    /// Returns the current snapshot, or `None` when nothing has been
    /// observed yet. A tombstoned object's last value is still returned;
    /// callers branching on deletion use [`ObjectObserver::is_deleted`].
    #[must_use]
    pub fn object(&self) -> Option<Document> {
        self.read().current.clone()
    }

    /// Returns true once a `Deleted` event has been observed and no later
    /// `Added`/`Modified` has revived the object.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.read().deleted
    }

    /// The number of events recorded so far.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.read().history.len()
    }

    /// Replays history in arrival order; the consumer returns `false` to
    /// stop early.
    ///
    /// Each call walks a snapshot of history taken at call start, so events
    /// appended mid-traversal are seen by the next call, not this one.
    pub fn range<F>(&self, mut consume: F)
    where
        F: FnMut(&WatchEvent) -> bool,
    {
        let snapshot = self.read().history.clone();
        for event in &snapshot {
            if !consume(event) {
                break;
            }
        }
    }
}
