//! Route table — which guard and page sit behind each path.
//!
//! DESIGN
//! ======
//! The table is static and declarative. Content routes sit behind the
//! protected guard, credential-entry routes behind the reverse guard, and
//! only the auth callback is public. The root path is protected and then
//! redirects to the landing page, so reaching the landing redirect already
//! requires a session.

use std::collections::BTreeMap;

use serde::Serialize;

pub const ROOT: &str = "/";
pub const LOGIN: &str = "/login";
pub const FACE_AUTH: &str = "/face-auth";
pub const HOME: &str = "/home";
pub const LANDING: &str = "/landing";
pub const AUTH_CALLBACK: &str = "/auth/callback";

// =============================================================================
// TABLE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardKind {
    Protected,
    Reverse,
    Public,
}

/// Pages rendered by the UI layer once a guard lets the visitor through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Landing,
    Login,
    FaceAuth,
    Home,
    TopCharts,
    GameDetail,
    GamesByCategory,
    AllGames,
}

impl Page {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Login => "login",
            Self::FaceAuth => "face-auth",
            Self::Home => "home",
            Self::TopCharts => "top-charts",
            Self::GameDetail => "game-detail",
            Self::GamesByCategory => "games-by-category",
            Self::AllGames => "all-games",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Page(Page),
    /// Navigate elsewhere (replacing history) once the guard lets the visitor through.
    Redirect(&'static str),
    AuthCallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteDef {
    pub pattern: &'static str,
    pub guard: GuardKind,
    pub target: Target,
}

const fn route(pattern: &'static str, guard: GuardKind, target: Target) -> RouteDef {
    RouteDef { pattern, guard, target }
}

pub static ROUTES: &[RouteDef] = &[
    route(ROOT, GuardKind::Protected, Target::Redirect(LANDING)),
    route(LOGIN, GuardKind::Reverse, Target::Page(Page::Login)),
    route(FACE_AUTH, GuardKind::Reverse, Target::Page(Page::FaceAuth)),
    route(HOME, GuardKind::Protected, Target::Page(Page::Home)),
    route("/top-charts", GuardKind::Protected, Target::Page(Page::TopCharts)),
    route(AUTH_CALLBACK, GuardKind::Public, Target::AuthCallback),
    route("/games/:id", GuardKind::Protected, Target::Page(Page::GameDetail)),
    route(LANDING, GuardKind::Protected, Target::Page(Page::Landing)),
    route("/games/filter/:category", GuardKind::Protected, Target::Page(Page::GamesByCategory)),
    route("/games", GuardKind::Protected, Target::Page(Page::AllGames)),
];

// =============================================================================
// MATCHING
// =============================================================================

pub type Params = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: &'static RouteDef,
    pub params: Params,
}

/// Find the route for `path` (no query string).
///
/// Segments match literally or bind a `:param`; trailing slashes are
/// ignored. When several patterns match, the one with more literal segments
/// wins, then the one declared first.
#[must_use]
pub fn resolve(path: &str) -> Option<RouteMatch> {
    let segments = split_segments(path);
    let mut best: Option<(usize, RouteMatch)> = None;

    for def in ROUTES {
        let Some(params) = match_pattern(def.pattern, &segments) else {
            continue;
        };
        let score = split_segments(def.pattern)
            .iter()
            .filter(|s| !s.starts_with(':'))
            .count();
        if best.as_ref().is_none_or(|(best_score, _)| score > *best_score) {
            best = Some((score, RouteMatch { route: def, params }));
        }
    }

    best.map(|(_, m)| m)
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn match_pattern(pattern: &str, segments: &[&str]) -> Option<Params> {
    let pattern_segments = split_segments(pattern);
    if pattern_segments.len() != segments.len() {
        return None;
    }

    let mut params = Params::new();
    for (expected, actual) in pattern_segments.iter().zip(segments) {
        if let Some(name) = expected.strip_prefix(':') {
            params.insert(name.to_owned(), (*actual).to_owned());
        } else if expected != actual {
            return None;
        }
    }
    Some(params)
}

// =============================================================================
// LOCATION
// =============================================================================

/// A client-side location: path plus optional query and fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    query: String,
    fragment: String,
}

impl Location {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let (rest, fragment) = raw.split_once('#').unwrap_or((raw, ""));
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        let path = if path.is_empty() { ROOT.to_owned() } else { path.to_owned() };
        Self { path, query: query.to_owned(), fragment: fragment.to_owned() }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// First value of query parameter `name`, form-urlencoded decoded.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        url::form_urlencoded::parse(self.query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        if !self.fragment.is_empty() {
            write!(f, "#{}", self.fragment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
