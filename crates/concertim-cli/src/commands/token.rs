//! `concertim-glue verify-token` — run the request authenticator offline.

use anyhow::{Result, bail};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderValue};
use concertim_auth::TokenAuthenticator;
use concertim_core::GlueConfig;

pub fn verify(config: &GlueConfig, authorization: &str) -> Result<()> {
    let auth = TokenAuthenticator::from_config(&config.auth);
    if check(&auth, authorization)? {
        println!("valid");
        Ok(())
    } else {
        println!("invalid");
        bail!("token rejected (see log for the reason)")
    }
}

fn check(auth: &TokenAuthenticator, authorization: &str) -> Result<bool> {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(authorization)?);
    Ok(auth.authenticate(&headers))
}
