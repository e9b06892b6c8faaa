use super::*;

// =============================================================
// CookieSession parsing
// =============================================================

#[test]
fn parse_splits_pairs_and_trims() {
    let jar = CookieSession::parse("theme=dark;  token=abc123 ; lang=en");
    assert_eq!(jar.get("theme"), Some("dark"));
    assert_eq!(jar.get("token"), Some("abc123"));
    assert_eq!(jar.get("lang"), Some("en"));
}

#[test]
fn parse_empty_string_has_no_cookies() {
    let jar = CookieSession::parse("");
    assert!(jar.is_empty());
    assert_eq!(jar.cookie_header(), None);
    assert_eq!(jar.token(), None);
}

#[test]
fn token_keeps_everything_after_first_equals() {
    let jar = CookieSession::parse("token=eyJhbGciOi==.payload==");
    assert_eq!(jar.token().as_deref(), Some("eyJhbGciOi==.payload=="));
}

#[test]
fn token_requires_exact_cookie_name() {
    let jar = CookieSession::parse("xtoken=nope; refresh_token=also-nope");
    assert_eq!(jar.token(), None);
}

#[test]
fn empty_token_counts_as_absent() {
    let jar = CookieSession::parse("token=");
    assert_eq!(jar.token(), None);
    assert_eq!(jar.cookie_header().as_deref(), Some("token="));
}

#[test]
fn cookie_header_rejoins_all_pairs() {
    let jar = CookieSession::parse("a=1;b=2");
    assert_eq!(jar.cookie_header().as_deref(), Some("a=1; b=2"));
}

#[test]
fn no_session_is_empty() {
    assert_eq!(NoSession.cookie_header(), None);
    assert_eq!(NoSession.token(), None);
}
