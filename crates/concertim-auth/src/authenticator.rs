//! Bearer token verification for inbound control requests.
//!
//! A request is authorized when its `Authorization` header reads
//! `Bearer <jwt>`, the JWT is HS256-signed with the configured secret, and
//! its `exp` claim lies strictly in the future. Issuer, audience and
//! not-before are not checked.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use concertim_core::config::AuthSettings;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AuthError, AuthResult};

const BEARER_PREFIX: &str = "Bearer ";

/// Claims read from a bearer token. Only `exp` is interpreted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BearerClaims {
    /// Expiration (Unix timestamp, seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Validates bearer credentials against an HMAC signing secret.
#[derive(Clone)]
pub struct TokenAuthenticator {
    secret: Option<String>,
}

impl fmt::Debug for TokenAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthenticator")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl TokenAuthenticator {
    /// `None` builds an authenticator that rejects everything.
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    /// Read the secret from the environment variable `var`.
    pub fn from_env(var: &str) -> Self {
        let auth = Self::new(std::env::var(var).ok());
        if !auth.has_secret() {
            warn!(var, "signing secret unset or empty; all bearer tokens will be rejected");
        }
        auth
    }

    /// Read the secret from the variable named in `[auth] secret_env`.
    pub fn from_config(settings: &AuthSettings) -> Self {
        Self::from_env(&settings.secret_env)
    }

    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    /// Whether the request headers carry a valid bearer token. Never fails;
    /// every rejection is logged and collapsed to `false`.
    pub fn authenticate(&self, headers: &HeaderMap) -> bool {
        self.authenticate_at(headers, epoch_secs())
    }

    /// [`authenticate`](Self::authenticate) against an explicit clock.
    pub fn authenticate_at(&self, headers: &HeaderMap, now: u64) -> bool {
        match self.verify(headers, now) {
            Ok(claims) => {
                debug!(exp = ?claims.exp, "bearer token accepted");
                true
            }
            Err(e) => {
                warn!(reason = %e, "bearer token rejected");
                false
            }
        }
    }

    /// Verify the headers and return the decoded claims.
    pub fn verify(&self, headers: &HeaderMap, now: u64) -> AuthResult<BearerClaims> {
        let value = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;
        let value = value.to_str().map_err(|_| AuthError::NotBearer)?;
        let token = value
            .strip_prefix(BEARER_PREFIX)
            .ok_or(AuthError::NotBearer)?;

        let secret = self.secret.as_deref().ok_or(AuthError::SecretUnavailable)?;
        let claims = decode_hs256(token, secret)?;

        let exp = claims.exp.ok_or(AuthError::MissingExpiry)?;
        if exp <= now {
            return Err(AuthError::Expired { exp, now });
        }
        Ok(claims)
    }
}

/// Check signature and `exp` presence. Expiry itself is compared by the
/// caller so tests can pin the clock.
fn decode_hs256(token: &str, secret: &str) -> AuthResult<BearerClaims> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["exp"]);
    validation.validate_exp = false;
    validation.validate_aud = false;

    jsonwebtoken::decode::<BearerClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::MissingRequiredClaim(claim) if claim == "exp" => AuthError::MissingExpiry,
            _ => AuthError::InvalidToken(e.to_string()),
        })
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
