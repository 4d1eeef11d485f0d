//! concertim-auth — bearer token checks for inbound control requests.
//!
//! [`TokenAuthenticator`] decides whether a request's `Authorization`
//! header carries a valid HS256 token; it fails closed and only ever
//! answers yes or no. [`protect`] applies it to an axum router.

pub mod authenticator;
pub mod error;
pub mod middleware;

pub use authenticator::{BearerClaims, TokenAuthenticator};
pub use error::{AuthError, AuthResult};
pub use middleware::{protect, require_bearer};
