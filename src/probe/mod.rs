//! Auth probe — asks both auth backends whether the current session is valid.
//!
//! DESIGN
//! ======
//! Two independent mechanisms can authenticate a visitor: a password session
//! (`/user/check`) and a biometric session (`/faceAuth/verify-auth`). Both are
//! queried concurrently and the verdict is their logical OR. The probe waits
//! for both requests to settle; one backend being down must not decide the
//! outcome on its own.
//!
//! ERROR HANDLING
//! ==============
//! Per-endpoint failures (network error, non-2xx status, unparseable body)
//! count as "not authenticated" for that endpoint and are only logged at
//! debug. Anything that prevents the probe from running at all is logged as
//! an error and yields `false`. Callers of [`HttpAuthProbe::verify_auth`]
//! never see an error.

pub mod transport;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::ProbeConfig;
use crate::session::SessionStore;

pub use transport::{RawResponse, ReqwestTransport, Transport, TransportError};

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// A session value could not be encoded as an HTTP header.
    #[error("invalid {0} header value")]
    InvalidHeader(&'static str),

    /// The verification routine failed as a whole.
    #[error("auth probe failed: {0}")]
    Failed(String),
}

// =============================================================================
// PROBE TRAIT
// =============================================================================

/// Produces a fresh auth verdict on every call. Verdicts are never cached.
#[async_trait]
pub trait AuthProbe: Send + Sync {
    /// Check whether the current session is authenticated.
    ///
    /// # Errors
    ///
    /// Implementations may surface a [`ProbeError`]; guards decide how to
    /// fail closed on it.
    async fn verify(&self) -> Result<bool, ProbeError>;
}

// =============================================================================
// ENDPOINTS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Password-session check; carries the bearer header.
    UserCheck,
    /// Biometric-session check; cookies only.
    FaceAuth,
}

impl Endpoint {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::UserCheck => "user_check",
            Self::FaceAuth => "face_auth",
        }
    }
}

// =============================================================================
// HTTP PROBE
// =============================================================================

/// Auth probe backed by the two HTTP check endpoints.
pub struct HttpAuthProbe<T = ReqwestTransport> {
    config: ProbeConfig,
    session: Arc<dyn SessionStore>,
    transport: T,
}

impl HttpAuthProbe<ReqwestTransport> {
    /// Build a probe with the production `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the HTTP client cannot be built.
    pub fn from_config(config: ProbeConfig, session: Arc<dyn SessionStore>) -> Result<Self, TransportError> {
        Ok(Self::new(config, session, ReqwestTransport::new()?))
    }
}

impl<T: Transport> HttpAuthProbe<T> {
    #[must_use]
    pub fn new(config: ProbeConfig, session: Arc<dyn SessionStore>, transport: T) -> Self {
        Self { config, session, transport }
    }

    #[must_use]
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Run both checks and reduce them to a verdict. Never fails.
    pub async fn verify_auth(&self) -> bool {
        match self.check().await {
            Ok(authenticated) => authenticated,
            Err(e) => {
                error!(error = %e, "auth verification failed");
                false
            }
        }
    }

    async fn check(&self) -> Result<bool, ProbeError> {
        let (user_headers, face_headers) = self.request_headers()?;
        let user_url = self.config.user_check_url();
        let face_url = self.config.face_check_url();

        let (user, face) = futures::future::join(
            self.transport.get(&user_url, user_headers),
            self.transport.get(&face_url, face_headers),
        )
        .await;

        let authenticated = reduce([(Endpoint::UserCheck, user), (Endpoint::FaceAuth, face)]);
        info!(authenticated, "auth probe verdict");
        Ok(authenticated)
    }

    /// Headers for the user-check and face-auth requests respectively.
    fn request_headers(&self) -> Result<(HeaderMap, HeaderMap), ProbeError> {
        let mut face = self.config.default_headers.clone();
        if let Some(cookies) = self.session.cookie_header() {
            let value = HeaderValue::from_str(&cookies).map_err(|_| ProbeError::InvalidHeader("cookie"))?;
            face.insert(COOKIE, value);
        }

        let mut user = face.clone();
        if let Some(token) = self.session.token() {
            let value =
                HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| ProbeError::InvalidHeader("authorization"))?;
            user.insert(AUTHORIZATION, value);
        }

        Ok((user, face))
    }
}

#[async_trait]
impl<T: Transport> AuthProbe for HttpAuthProbe<T> {
    async fn verify(&self) -> Result<bool, ProbeError> {
        Ok(self.verify_auth().await)
    }
}

// =============================================================================
// REDUCTION
// =============================================================================

/// OR together the settled outcomes of every endpoint.
///
/// Every outcome is inspected (and logged) even after one authenticates.
pub fn reduce<I>(outcomes: I) -> bool
where
    I: IntoIterator<Item = (Endpoint, Result<RawResponse, TransportError>)>,
{
    outcomes
        .into_iter()
        .map(|(endpoint, outcome)| match outcome {
            Ok(response) => {
                let authenticated = response_authenticates(&response);
                debug!(endpoint = endpoint.name(), status = response.status, authenticated, "auth endpoint settled");
                authenticated
            }
            Err(e) => {
                debug!(endpoint = endpoint.name(), error = %e, "auth endpoint unreachable");
                false
            }
        })
        .fold(false, |acc, authenticated| acc || authenticated)
}

/// Whether one settled response asserts authentication.
///
/// Requires a 2xx status and a JSON body. The body authenticates unless it
/// carries `"authenticated": false` exactly; a `null` body never does.
#[must_use]
pub fn response_authenticates(response: &RawResponse) -> bool {
    if !response.is_success() {
        return false;
    }
    match serde_json::from_str::<Value>(&response.body) {
        Ok(Value::Null) | Err(_) => false,
        Ok(body) => body.get("authenticated") != Some(&Value::Bool(false)),
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
