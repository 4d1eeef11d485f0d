//! Reasons a bearer token is rejected.
//!
//! Callers of `TokenAuthenticator::authenticate` only ever see `false`;
//! these variants label the diagnostic log line for each rejection.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("no Authorization header")]
    MissingHeader,

    #[error("Authorization header is not a Bearer credential")]
    NotBearer,

    #[error("signing secret is not configured")]
    SecretUnavailable,

    #[error("token failed verification: {0}")]
    InvalidToken(String),

    #[error("token has no expiry claim")]
    MissingExpiry,

    #[error("token expired at {exp} (now {now})")]
    Expired { exp: u64, now: u64 },
}

pub type AuthResult<T> = Result<T, AuthError>;
