//! Reverse guard — keeps signed-in visitors away from login and enrollment.
//!
//! `Checking -> Done`. An authenticated session is sent home (replacing the
//! history entry); anything else, including a probe error, falls through to
//! the wrapped public content. There is no minimum loading delay here.

use std::sync::Arc;

use tokio::sync::{oneshot, watch};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use super::{GuardHandle, GuardState, NavigateOptions, Navigator, is_unmounted};
use crate::probe::AuthProbe;
use crate::routes::HOME;
use crate::view::{LoadingIndicator, View};

pub const CHECKING_CAPTION: &str = "Checking authentication...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReverseState {
    Checking,
    /// `redirected_to` is set when the visitor was sent away.
    Done { redirected_to: Option<String> },
}

impl GuardState for ReverseState {
    fn is_settled(&self) -> bool {
        matches!(self, Self::Done { .. })
    }
}

impl ReverseState {
    pub fn view<C>(&self, content: C) -> View<C> {
        match self {
            Self::Checking => View::Loading(LoadingIndicator::caption(CHECKING_CAPTION)),
            Self::Done { redirected_to: None } => View::Content(content),
            Self::Done { redirected_to: Some(_) } => View::Empty,
        }
    }
}

#[derive(Clone)]
pub struct ReverseGuard {
    probe: Arc<dyn AuthProbe>,
    navigator: Arc<dyn Navigator>,
}

impl ReverseGuard {
    #[must_use]
    pub fn new(probe: Arc<dyn AuthProbe>, navigator: Arc<dyn Navigator>) -> Self {
        Self { probe, navigator }
    }

    /// Start checking. Must be called from within a tokio runtime.
    #[must_use]
    pub fn mount(&self) -> GuardHandle<ReverseState> {
        let id = Uuid::new_v4();
        let (state_tx, state_rx) = watch::channel(ReverseState::Checking);
        let (unmount_tx, unmount_rx) = oneshot::channel();

        let task = tokio::spawn(
            check(self.probe.clone(), self.navigator.clone(), state_tx, unmount_rx)
                .instrument(info_span!("reverse_guard", guard_id = %id)),
        );

        GuardHandle::new(id, state_rx, unmount_tx, task)
    }
}

async fn check(
    probe: Arc<dyn AuthProbe>,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<ReverseState>,
    mut unmount: oneshot::Receiver<()>,
) {
    let verdict = tokio::select! {
        biased;
        _ = &mut unmount => {
            debug!("unmounted while checking; probe abandoned");
            return;
        }
        verdict = probe.verify() => verdict,
    };

    if is_unmounted(&mut unmount) {
        return;
    }

    let redirected_to = match verdict {
        Ok(true) => {
            info!(to = HOME, "already authenticated; redirecting");
            navigator.navigate(HOME, NavigateOptions::replace());
            Some(HOME.to_owned())
        }
        Ok(false) => {
            debug!("not authenticated; showing public route");
            None
        }
        Err(e) => {
            warn!(error = %e, "auth check failed; showing public route");
            None
        }
    };

    state.send_replace(ReverseState::Done { redirected_to });
}

#[cfg(test)]
#[path = "reverse_test.rs"]
mod tests;
