//! Router — mounts the right guard for a location and follows navigation.
//!
//! DESIGN
//! ======
//! `mount` is a pure dispatch over the route table: resolve the path, then
//! wrap the destination in the guard its route declares. `visit` plays the
//! part of the browser: it mounts, waits for the guard to settle, and if the
//! history moved (a guard redirect, the callback handler, or the root
//! route's post-auth redirect) unmounts and mounts the next location.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::callback::AuthCallback;
use crate::config::DEFAULT_MIN_VERIFY_MS;
use crate::guard::{GuardHandle, Navigator, ProtectedGuard, ProtectedState, ReverseGuard, ReverseState};
use crate::history::MemoryHistory;
use crate::probe::AuthProbe;
use crate::routes::{GuardKind, Location, Params, Target, resolve};
use crate::view::View;

/// Upper bound on locations visited by one [`Router::visit`] call.
pub const MAX_REDIRECTS: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("too many redirects from {start} (trail: {trail:?})")]
    TooManyRedirects { start: String, trail: Vec<String> },
}

/// What a route renders once its guard lets the visitor through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Destination {
    pub target: Target,
    pub params: Params,
}

// =============================================================================
// MOUNTED ROUTE
// =============================================================================

/// A route currently on screen.
pub enum Mounted {
    Protected { handle: GuardHandle<ProtectedState>, destination: Destination },
    Reverse { handle: GuardHandle<ReverseState>, destination: Destination },
    Callback(AuthCallback),
    /// Public route with ordinary content.
    Open(Destination),
    NotFound { path: String },
}

impl Mounted {
    #[must_use]
    pub fn view(&self) -> View<Destination> {
        match self {
            Self::Protected { handle, destination } => handle.state().view(destination.clone()),
            Self::Reverse { handle, destination } => handle.state().view(destination.clone()),
            Self::Callback(callback) => callback.view(),
            Self::Open(destination) => View::Content(destination.clone()),
            Self::NotFound { .. } => View::Empty,
        }
    }

    /// Wait until the route has decided what to show.
    pub async fn settle(&mut self) -> View<Destination> {
        match self {
            Self::Protected { handle, destination } => handle.settled().await.view(destination.clone()),
            Self::Reverse { handle, destination } => handle.settled().await.view(destination.clone()),
            Self::Callback(_) | Self::Open(_) | Self::NotFound { .. } => self.view(),
        }
    }

    pub async fn unmount(self) {
        match self {
            Self::Protected { handle, .. } => handle.unmount().await,
            Self::Reverse { handle, .. } => handle.unmount().await,
            Self::Callback(_) | Self::Open(_) | Self::NotFound { .. } => {}
        }
    }
}

/// Outcome of [`Router::visit`].
pub struct Visit {
    /// Every location mounted, in order.
    pub trail: Vec<String>,
    pub view: View<Destination>,
    /// The final route, still mounted.
    pub mounted: Mounted,
}

// =============================================================================
// ROUTER
// =============================================================================

pub struct Router {
    probe: Arc<dyn AuthProbe>,
    history: Arc<MemoryHistory>,
    min_verify_delay: Duration,
}

impl Router {
    #[must_use]
    pub fn new(probe: Arc<dyn AuthProbe>, history: Arc<MemoryHistory>) -> Self {
        Self { probe, history, min_verify_delay: Duration::from_millis(DEFAULT_MIN_VERIFY_MS) }
    }

    #[must_use]
    pub fn with_min_verify_delay(mut self, delay: Duration) -> Self {
        self.min_verify_delay = delay;
        self
    }

    #[must_use]
    pub fn history(&self) -> &Arc<MemoryHistory> {
        &self.history
    }

    /// Mount the route for `location`. Must be called from within a tokio
    /// runtime.
    #[must_use]
    pub fn mount(&self, location: &Location) -> Mounted {
        let Some(matched) = resolve(location.path()) else {
            warn!(path = location.path(), "no route matches");
            return Mounted::NotFound { path: location.path().to_owned() };
        };

        let navigator: Arc<dyn Navigator> = self.history.clone();
        let destination = Destination { target: matched.route.target, params: matched.params };

        match (matched.route.guard, matched.route.target) {
            (_, Target::AuthCallback) => Mounted::Callback(AuthCallback::mount(location, navigator.as_ref())),
            (GuardKind::Protected, _) => {
                let guard = ProtectedGuard::new(self.probe.clone(), navigator).with_min_verify_delay(self.min_verify_delay);
                Mounted::Protected { handle: guard.mount(), destination }
            }
            (GuardKind::Reverse, _) => {
                let guard = ReverseGuard::new(self.probe.clone(), navigator);
                Mounted::Reverse { handle: guard.mount(), destination }
            }
            (GuardKind::Public, _) => Mounted::Open(destination),
        }
    }

    /// Navigate to `path` and follow redirects until the location is stable.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::TooManyRedirects`] if more than
    /// [`MAX_REDIRECTS`] locations are mounted.
    pub async fn visit(&self, path: &str) -> Result<Visit, RouterError> {
        self.history.push(path);
        let mut trail = vec![path.to_owned()];

        loop {
            let location = self.history.current();
            let mut mounted = self.mount(&Location::parse(&location));
            let view = mounted.settle().await;

            if let View::Content(Destination { target: Target::Redirect(to), .. }) = &view {
                self.history.replace(to);
            }

            let next = self.history.current();
            if next == location {
                info!(location = %location, hops = trail.len() - 1, "visit settled");
                return Ok(Visit { trail, view, mounted });
            }

            mounted.unmount().await;
            trail.push(next);
            if trail.len() > MAX_REDIRECTS {
                warn!(start = path, "redirect loop detected");
                return Err(RouterError::TooManyRedirects { start: path.to_owned(), trail });
            }
        }
    }
}

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;
