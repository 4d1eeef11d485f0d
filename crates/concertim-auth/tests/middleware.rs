//! Router gating tests.
//!
//! Drives a protected router with `tower::ServiceExt::oneshot` and checks
//! that only requests carrying a valid bearer token reach the handler.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use axum::routing::get;
use concertim_auth::{TokenAuthenticator, protect};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use tower::ServiceExt;

const SECRET: &str = "middleware-secret";

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn token(exp: u64) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &serde_json::json!({ "exp": exp }),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn router(secret: Option<&str>) -> Router {
    let auth = Arc::new(TokenAuthenticator::new(secret.map(str::to_string)));
    protect(Router::new().route("/ping", get(|| async { "pong" })), auth)
}

fn request(authorization: Option<String>) -> Request<Body> {
    let mut builder = Request::builder().uri("/ping");
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn valid_token_reaches_handler() {
    let resp = router(Some(SECRET))
        .oneshot(request(Some(format!("Bearer {}", token(now() + 300)))))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"pong");
}

#[tokio::test]
async fn missing_header_is_unauthorized() {
    let resp = router(Some(SECRET)).oneshot(request(None)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "unauthorized");
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let resp = router(Some(SECRET))
        .oneshot(request(Some(format!("Bearer {}", token(now() - 1)))))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unconfigured_secret_blocks_everything() {
    let resp = router(None)
        .oneshot(request(Some(format!("Bearer {}", token(now() + 300)))))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
