//! Protected guard — keeps unauthenticated visitors out of content routes.
//!
//! DESIGN
//! ======
//! `Verifying -> {Authorized, Redirecting}`. A positive verdict is held back
//! until `min_verify_delay` has passed since mount so the loading view never
//! flashes; the delay is measured from mount, so a slow probe eats into it.
//! A negative verdict or a probe error redirects to login at once, replacing
//! the history entry so "back" cannot return to the protected page.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::time::Instant;
use tracing::{Instrument, debug, error, info, info_span};
use uuid::Uuid;

use super::{GuardHandle, GuardState, NavigateOptions, Navigator, is_unmounted};
use crate::config::DEFAULT_MIN_VERIFY_MS;
use crate::probe::AuthProbe;
use crate::routes::LOGIN;
use crate::view::{LoadingIndicator, View};

pub const LOADING_ANIMATION_URL: &str = "https://lottie.host/376c2d63-c220-4987-b922-67d602ba3510/DCVf0jB4V9.lottie";
pub const VERIFYING_CAPTION: &str = "Verifying authentication...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtectedState {
    Verifying,
    Authorized,
    Redirecting { to: String },
}

impl GuardState for ProtectedState {
    fn is_settled(&self) -> bool {
        !matches!(self, Self::Verifying)
    }
}

impl ProtectedState {
    /// Render this state around `content`. Content is only ever shown once
    /// authorized.
    pub fn view<C>(&self, content: C) -> View<C> {
        match self {
            Self::Verifying => View::Loading(LoadingIndicator::full_viewport(LOADING_ANIMATION_URL, VERIFYING_CAPTION)),
            Self::Authorized => View::Content(content),
            Self::Redirecting { .. } => View::Empty,
        }
    }
}

/// Mounts protected-route checks against a shared probe and navigator.
#[derive(Clone)]
pub struct ProtectedGuard {
    probe: Arc<dyn AuthProbe>,
    navigator: Arc<dyn Navigator>,
    min_verify_delay: Duration,
}

impl ProtectedGuard {
    #[must_use]
    pub fn new(probe: Arc<dyn AuthProbe>, navigator: Arc<dyn Navigator>) -> Self {
        Self { probe, navigator, min_verify_delay: Duration::from_millis(DEFAULT_MIN_VERIFY_MS) }
    }

    #[must_use]
    pub fn with_min_verify_delay(mut self, delay: Duration) -> Self {
        self.min_verify_delay = delay;
        self
    }

    /// Start verifying. Must be called from within a tokio runtime.
    #[must_use]
    pub fn mount(&self) -> GuardHandle<ProtectedState> {
        let id = Uuid::new_v4();
        let (state_tx, state_rx) = watch::channel(ProtectedState::Verifying);
        let (unmount_tx, unmount_rx) = oneshot::channel();

        let task = tokio::spawn(
            verify(self.probe.clone(), self.navigator.clone(), self.min_verify_delay, state_tx, unmount_rx)
                .instrument(info_span!("protected_guard", guard_id = %id)),
        );

        GuardHandle::new(id, state_rx, unmount_tx, task)
    }
}

async fn verify(
    probe: Arc<dyn AuthProbe>,
    navigator: Arc<dyn Navigator>,
    min_verify_delay: Duration,
    state: watch::Sender<ProtectedState>,
    mut unmount: oneshot::Receiver<()>,
) {
    let started = Instant::now();

    let verdict = tokio::select! {
        biased;
        _ = &mut unmount => {
            debug!("unmounted while verifying; probe abandoned");
            return;
        }
        verdict = probe.verify() => verdict,
    };

    match verdict {
        Ok(true) => {
            let remaining = min_verify_delay.saturating_sub(started.elapsed());
            if !remaining.is_zero() {
                tokio::select! {
                    biased;
                    _ = &mut unmount => {
                        debug!("unmounted during minimum loading delay");
                        return;
                    }
                    () = tokio::time::sleep(remaining) => {}
                }
            }
            if is_unmounted(&mut unmount) {
                return;
            }
            info!(elapsed = ?started.elapsed(), "session verified");
            state.send_replace(ProtectedState::Authorized);
        }
        Ok(false) => {
            if is_unmounted(&mut unmount) {
                return;
            }
            info!(to = LOGIN, "session not authenticated; redirecting");
            redirect_to_login(&state, navigator.as_ref());
        }
        Err(e) => {
            if is_unmounted(&mut unmount) {
                return;
            }
            error!(error = %e, "authentication verification error; redirecting");
            redirect_to_login(&state, navigator.as_ref());
        }
    }
}

fn redirect_to_login(state: &watch::Sender<ProtectedState>, navigator: &dyn Navigator) {
    // The new location must be in place before the settled state is observable.
    navigator.navigate(LOGIN, NavigateOptions::replace());
    state.send_replace(ProtectedState::Redirecting { to: LOGIN.to_owned() });
}

#[cfg(test)]
#[path = "protected_test.rs"]
mod tests;
