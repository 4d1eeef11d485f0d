//! axum middleware gating a router behind [`TokenAuthenticator`].

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};

use crate::authenticator::TokenAuthenticator;

/// Reject the request with 401 unless it carries a valid bearer token.
pub async fn require_bearer(
    State(auth): State<Arc<TokenAuthenticator>>,
    request: Request,
    next: Next,
) -> Response {
    if auth.authenticate(request.headers()) {
        next.run(request).await
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "unauthorized" })),
        )
            .into_response()
    }
}

/// Wrap every route of `router` with [`require_bearer`].
pub fn protect<S>(router: Router<S>, auth: Arc<TokenAuthenticator>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(auth, require_bearer))
}
