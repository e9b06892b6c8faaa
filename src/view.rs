//! What a route shows at a given moment.
//!
//! The component tree behind a route is owned by the rendering layer; guards
//! only decide between a loading placeholder, the wrapped content, or nothing
//! at all while a redirect is in flight.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View<C> {
    /// Placeholder shown while the session is being checked.
    Loading(LoadingIndicator),
    /// The wrapped content, unmodified.
    Content(C),
    /// Nothing; the visitor is being sent elsewhere.
    Empty,
}

impl<C> View<C> {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }

    #[must_use]
    pub fn content(&self) -> Option<&C> {
        match self {
            Self::Content(content) => Some(content),
            Self::Loading(_) | Self::Empty => None,
        }
    }

    pub fn map<D>(self, f: impl FnOnce(C) -> D) -> View<D> {
        match self {
            Self::Loading(indicator) => View::Loading(indicator),
            Self::Content(content) => View::Content(f(content)),
            Self::Empty => View::Empty,
        }
    }
}

/// Loading placeholder description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadingIndicator {
    /// Animation asset to loop, if any.
    pub animation: Option<&'static str>,
    pub caption: &'static str,
    /// Centered in the full viewport rather than inline.
    pub full_viewport: bool,
}

impl LoadingIndicator {
    #[must_use]
    pub const fn full_viewport(animation: &'static str, caption: &'static str) -> Self {
        Self { animation: Some(animation), caption, full_viewport: true }
    }

    #[must_use]
    pub const fn caption(caption: &'static str) -> Self {
        Self { animation: None, caption, full_viewport: false }
    }
}
