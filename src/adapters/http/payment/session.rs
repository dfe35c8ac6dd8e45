//! Browser session extraction.
//!
//! The session id travels in a cookie whose name comes from configuration.
//! A missing or malformed cookie is not an error: the request simply has no
//! session, and the reconciler falls back accordingly.

use std::convert::Infallible;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use super::handlers::PaymentAppState;
use crate::domain::foundation::SessionId;

/// Session the request arrived with, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserSession(pub Option<SessionId>);

#[async_trait]
impl FromRequestParts<PaymentAppState> for BrowserSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &PaymentAppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(BrowserSession(session_from_headers(
            &parts.headers,
            &state.cookie_name,
        )))
    }
}

/// Finds `cookie_name` across all `Cookie` headers.
pub fn session_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<SessionId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .and_then(|(_, value)| SessionId::parse(value.trim_matches('"')).ok())
}
