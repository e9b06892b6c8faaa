//! Session credential access.
//!
//! The session token lives in a cookie issued by the backend. This layer only
//! reads it: the cookie string is attached to probe requests as credentials,
//! and the `token` cookie is additionally echoed as a bearer header. Holding a
//! token says nothing about its validity; only a probe can establish that.

pub const TOKEN_COOKIE: &str = "token";

/// Read-only view of the session credentials available to the probe.
pub trait SessionStore: Send + Sync {
    /// Full cookie string to send as credentials, if any cookies exist.
    fn cookie_header(&self) -> Option<String>;

    /// Value of the session token cookie, if present and non-empty.
    fn token(&self) -> Option<String>;
}

/// Cookies parsed from a `document.cookie`-style string (`a=1; token=xyz`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieSession {
    pairs: Vec<(String, String)>,
}

impl CookieSession {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let pairs = raw
            .split(';')
            .filter_map(|part| {
                let part = part.trim();
                if part.is_empty() {
                    return None;
                }
                match part.split_once('=') {
                    Some((name, value)) => Some((name.trim().to_owned(), value.trim().to_owned())),
                    None => Some((part.to_owned(), String::new())),
                }
            })
            .collect();
        Self { pairs }
    }

    /// Look up a cookie by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl SessionStore for CookieSession {
    fn cookie_header(&self) -> Option<String> {
        if self.pairs.is_empty() {
            return None;
        }
        let joined = self
            .pairs
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        Some(joined)
    }

    fn token(&self) -> Option<String> {
        self.get(TOKEN_COOKIE)
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
    }
}

/// A visitor with no cookies at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSession;

impl SessionStore for NoSession {
    fn cookie_header(&self) -> Option<String> {
        None
    }

    fn token(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
