//! Completion handles for submitted tasks

use crate::error::{Error, Result};
use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::sync::Arc;

/// Observable lifecycle state of an event
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EventStatus {
    /// The task has not finished yet
    Pending,
    /// The task finished successfully
    Complete,
    /// The task failed; `Event::wait` returns the captured message
    Failed,
}

enum State {
    Pending,
    Complete,
    Failed(String),
}

struct EventInner {
    state: Mutex<State>,
    cond: Condvar,
}

/// Opaque completion handle for one scheduled unit of work
///
/// Created at submission time, completed (or failed) exactly once when the
/// task finishes, and consumed by later submissions as an explicit
/// predecessor constraint. Cloning shares the same underlying handle.
#[derive(Clone)]
pub struct Event {
    inner: Arc<EventInner>,
}

impl Event {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(EventInner {
                state: Mutex::new(State::Pending),
                cond: Condvar::new(),
            }),
        }
    }

    /// An event that is already complete, for seeding dependency chains
    pub fn ready() -> Self {
        let ev = Self::new();
        ev.complete();
        ev
    }

    pub(crate) fn complete(&self) {
        let mut state = self.inner.state.lock();
        if matches!(*state, State::Pending) {
            *state = State::Complete;
            self.inner.cond.notify_all();
        }
    }

    pub(crate) fn fail(&self, message: String) {
        let mut state = self.inner.state.lock();
        if matches!(*state, State::Pending) {
            *state = State::Failed(message);
            self.inner.cond.notify_all();
        }
    }

    /// Current status without blocking
    pub fn status(&self) -> EventStatus {
        match *self.inner.state.lock() {
            State::Pending => EventStatus::Pending,
            State::Complete => EventStatus::Complete,
            State::Failed(_) => EventStatus::Failed,
        }
    }

    /// Block until the task finishes, surfacing an asynchronous failure
    pub fn wait(&self) -> Result<()> {
        let mut state = self.inner.state.lock();
        while matches!(*state, State::Pending) {
            self.inner.cond.wait(&mut state);
        }
        match &*state {
            State::Complete => Ok(()),
            State::Failed(message) => Err(Error::AsyncTaskFailed {
                message: message.clone(),
            }),
            State::Pending => unreachable!("woken while still pending"),
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event").field("status", &self.status()).finish()
    }
}
