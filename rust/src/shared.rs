//! Thread-safe wrapper around a [`Dispatcher`].
//!
//! Mutating commands hold the write lock for the whole operation, including
//! every split, merge and borrow it cascades into. Read-only commands and
//! snapshots share the read lock, so they run concurrently with each other
//! but never observe a tree mid-mutation.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::dispatcher::{Command, Dispatcher, Outcome};
use crate::error::BTreeResult;
use crate::snapshot::{Response, TreeSnapshot};
use crate::types::Key;

/// A cloneable handle to one dispatcher shared between threads.
#[derive(Debug, Clone, Default)]
pub struct SharedDispatcher {
    inner: Arc<RwLock<Dispatcher>>,
}

impl SharedDispatcher {
    /// Create a handle around an uninitialized dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing dispatcher.
    pub fn from_dispatcher(dispatcher: Dispatcher) -> Self {
        Self {
            inner: Arc::new(RwLock::new(dispatcher)),
        }
    }

    /// Execute a command under the appropriate lock.
    pub fn execute(&self, command: Command) -> BTreeResult<Outcome> {
        if command.is_read_only() {
            self.inner.read().query(command)
        } else {
            self.inner.write().execute(command)
        }
    }

    /// Execute a command and wrap the result in the JSON envelope.
    pub fn respond(&self, command: Command) -> Response {
        match self.execute(command) {
            Ok(outcome) => outcome.into_response(),
            Err(err) => Response::failure(&err),
        }
    }

    /// Full-structure snapshot taken under the read lock.
    pub fn snapshot(&self) -> BTreeResult<TreeSnapshot<Key>> {
        self.inner.read().snapshot()
    }

    /// Run `f` with shared access to the dispatcher.
    pub fn with_read<R>(&self, f: impl FnOnce(&Dispatcher) -> R) -> R {
        f(&self.inner.read())
    }
}
