use super::*;

/// # Safety
/// Tests must run with `--test-threads=1` to avoid env races.
unsafe fn clear_probe_env() {
    unsafe {
        std::env::remove_var("API_URL");
        std::env::remove_var("AUTH_USER_CHECK_PATH");
        std::env::remove_var("AUTH_FACE_CHECK_PATH");
        std::env::remove_var("AUTH_MIN_VERIFY_MS");
    }
}

#[test]
fn new_trims_trailing_slash() {
    let cfg = ProbeConfig::new("https://api.example.test/v1/").unwrap();
    assert_eq!(cfg.api_url, "https://api.example.test/v1");
    assert_eq!(cfg.user_check_url(), "https://api.example.test/v1/user/check");
    assert_eq!(cfg.face_check_url(), "https://api.example.test/v1/faceAuth/verify-auth");
}

#[test]
fn new_sets_json_default_headers() {
    let cfg = ProbeConfig::new("http://localhost:5000").unwrap();
    assert_eq!(cfg.default_headers.get(CONTENT_TYPE).unwrap(), "application/json");
    assert_eq!(cfg.default_headers.get(ACCEPT).unwrap(), "application/json");
    assert_eq!(cfg.min_verify_delay, Duration::from_millis(2000));
}

#[test]
fn new_rejects_relative_url() {
    let err = ProbeConfig::new("/api").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidUrl { .. }));
}

#[test]
fn new_rejects_non_http_scheme() {
    let err = ProbeConfig::new("ftp://files.example.test").unwrap_err().to_string();
    assert!(err.contains("scheme must be http or https"));
}

#[test]
fn with_header_adds_value() {
    let cfg = ProbeConfig::new("http://localhost:5000")
        .unwrap()
        .with_header("x-client", "playgate")
        .unwrap();
    assert_eq!(cfg.default_headers.get("x-client").unwrap(), "playgate");
}

#[test]
fn with_header_rejects_bad_name() {
    let err = ProbeConfig::new("http://localhost:5000")
        .unwrap()
        .with_header("bad header", "v")
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidHeader(_)));
}

#[test]
fn normalize_path_adds_leading_slash() {
    assert_eq!(normalize_path("user/check"), "/user/check");
    assert_eq!(normalize_path(" /faceAuth/verify-auth "), "/faceAuth/verify-auth");
}

// One test body so the env mutations below never interleave with each other.
#[test]
fn from_env_required_defaults_and_overrides() {
    unsafe { clear_probe_env() };
    let err = ProbeConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::MissingVar("API_URL")));

    unsafe {
        std::env::set_var("API_URL", "http://127.0.0.1:8080/");
        std::env::set_var("AUTH_MIN_VERIFY_MS", "soon");
    }
    let cfg = ProbeConfig::from_env().unwrap();
    assert_eq!(cfg.user_check_url(), "http://127.0.0.1:8080/user/check");
    assert_eq!(cfg.min_verify_delay, Duration::from_millis(DEFAULT_MIN_VERIFY_MS));

    unsafe {
        std::env::set_var("AUTH_USER_CHECK_PATH", "session/check");
        std::env::set_var("AUTH_FACE_CHECK_PATH", "/face/verify");
        std::env::set_var("AUTH_MIN_VERIFY_MS", "250");
    }
    let cfg = ProbeConfig::from_env().unwrap();
    assert_eq!(cfg.user_check_url(), "http://127.0.0.1:8080/session/check");
    assert_eq!(cfg.face_check_url(), "http://127.0.0.1:8080/face/verify");
    assert_eq!(cfg.min_verify_delay, Duration::from_millis(250));

    unsafe { clear_probe_env() };
}
