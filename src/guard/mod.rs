//! Route guards — conditionally render a route based on an auth verdict.
//!
//! DESIGN
//! ======
//! A guard is mounted for one route visit. Mounting spawns a task that runs
//! the probe and publishes state transitions on a `watch` channel; the caller
//! keeps a [`GuardHandle`] for as long as the route is on screen.
//!
//! Unmounting (explicitly or by dropping the handle) fires a `oneshot`
//! signal that every suspension point in the guard task races against. When
//! it wins, the task returns without touching state or navigation, and the
//! in-flight probe future is dropped, which aborts its HTTP requests.

pub mod protected;
pub mod reverse;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::warn;
use uuid::Uuid;

pub use protected::{ProtectedGuard, ProtectedState};
pub use reverse::{ReverseGuard, ReverseState};

// =============================================================================
// NAVIGATION
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
}

impl NavigateOptions {
    #[must_use]
    pub fn replace() -> Self {
        Self { replace: true }
    }

    #[must_use]
    pub fn push() -> Self {
        Self { replace: false }
    }
}

/// Moves the visitor to another location.
pub trait Navigator: Send + Sync {
    fn navigate(&self, to: &str, options: NavigateOptions);
}

// =============================================================================
// GUARD HANDLE
// =============================================================================

/// State published by a guard task.
pub trait GuardState: Clone + Send + Sync + 'static {
    /// True once the guard has decided what to show.
    fn is_settled(&self) -> bool;
}

/// Owner's side of a mounted guard.
pub struct GuardHandle<S: GuardState> {
    id: Uuid,
    state: watch::Receiver<S>,
    unmount: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl<S: GuardState> GuardHandle<S> {
    pub(crate) fn new(id: Uuid, state: watch::Receiver<S>, unmount: oneshot::Sender<()>, task: JoinHandle<()>) -> Self {
        Self { id, state, unmount: Some(unmount), task: Some(task) }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> S {
        self.state.borrow().clone()
    }

    /// A fresh receiver for observing transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.state.clone()
    }

    /// Wait until the guard settles, or its task ends without settling.
    pub async fn settled(&mut self) -> S {
        let settled = self.state.wait_for(S::is_settled).await.map(|state| state.clone());
        settled.unwrap_or_else(|_| self.state.borrow().clone())
    }

    /// Tear the guard down. No state update or navigation happens once this
    /// returns.
    pub async fn unmount(mut self) {
        if let Some(signal) = self.unmount.take() {
            let _ = signal.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(guard_id = %self.id, error = %e, "guard task ended abnormally");
            }
        }
    }
}

/// True once the owning handle has unmounted or been dropped.
pub(crate) fn is_unmounted(signal: &mut oneshot::Receiver<()>) -> bool {
    !matches!(signal.try_recv(), Err(oneshot::error::TryRecvError::Empty))
}

impl<S: GuardState> Drop for GuardHandle<S> {
    fn drop(&mut self) {
        if let Some(signal) = self.unmount.take() {
            let _ = signal.send(());
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
