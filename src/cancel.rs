//! User-initiated cancellation shared between a signal handler and the
//! blocking steps of an invocation.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct State {
    cancelled: AtomicBool,
    watchers: AtomicUsize,
}

/// Cloneable cancellation flag.
///
/// Blocking steps that poll the flag hold a [`Watch`] while they wait, so
/// whoever raises the flag can tell whether anything will notice it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    state: Arc<State>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag. Returns true if a step is currently watching and
    /// will unwind on its own.
    pub fn cancel(&self) -> bool {
        self.state.cancelled.store(true, Ordering::SeqCst);
        self.state.watchers.load(Ordering::SeqCst) > 0
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Marks the caller as polling the flag until the guard drops.
    pub fn watch(&self) -> Watch<'_> {
        self.state.watchers.fetch_add(1, Ordering::SeqCst);
        Watch { token: self }
    }

    pub(crate) fn check(&self) -> crate::Result<()> {
        if self.is_cancelled() {
            Err(crate::CoreError::UserCancelled)
        } else {
            Ok(())
        }
    }
}

/// Guard returned by [`CancelToken::watch`].
#[derive(Debug)]
pub struct Watch<'a> {
    token: &'a CancelToken,
}

impl Drop for Watch<'_> {
    fn drop(&mut self) {
        self.token.state.watchers.fetch_sub(1, Ordering::SeqCst);
    }
}
