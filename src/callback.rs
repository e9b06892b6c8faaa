//! Landing point for the post-login redirect.
//!
//! The backend sets the session cookie before redirecting here with a
//! `token` query parameter. Only whether the parameter carries a value
//! matters; the value itself is never stored by this layer.

use tracing::info;

use crate::guard::{NavigateOptions, Navigator};
use crate::routes::{HOME, LOGIN, Location};
use crate::view::{LoadingIndicator, View};

pub const TOKEN_PARAM: &str = "token";
pub const CALLBACK_CAPTION: &str = "Loading...";

/// Where a callback location should send the visitor.
///
/// An empty `token` value is treated like a missing one.
#[must_use]
pub fn callback_destination(location: &Location) -> &'static str {
    match location.query_param(TOKEN_PARAM) {
        Some(token) if !token.is_empty() => HOME,
        _ => LOGIN,
    }
}

/// A mounted callback handler. It navigates on mount and shows a plain
/// loading caption until the router moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthCallback {
    destination: &'static str,
}

impl AuthCallback {
    pub fn mount(location: &Location, navigator: &dyn Navigator) -> Self {
        let destination = callback_destination(location);
        info!(to = destination, "auth callback");
        navigator.navigate(destination, NavigateOptions::push());
        Self { destination }
    }

    #[must_use]
    pub fn destination(&self) -> &'static str {
        self.destination
    }

    #[must_use]
    pub fn view<C>(&self) -> View<C> {
        View::Loading(LoadingIndicator::caption(CALLBACK_CAPTION))
    }
}

#[cfg(test)]
#[path = "callback_test.rs"]
mod tests;
