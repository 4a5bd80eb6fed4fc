//! Bearer-token gate for protected routes.
//!
//! # Responsibilities
//! - Extract the token from `Authorization: Bearer <token>`
//! - Verify it against the shared secret
//! - Attach the verified [`Claims`] to the request for handlers
//!
//! # Design Decisions
//! - Every failure is the same 403 to the client; the reason is logged
//! - Scheme match is case-insensitive, the token itself is not trimmed

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::token::{AuthError, Claims, TokenKeys};
use crate::error::ApiError;
use crate::http::request::request_id;

const BEARER: &str = "bearer ";

/// Pull the raw token out of the `Authorization` header.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    if value.len() < BEARER.len() || !value[..BEARER.len()].eq_ignore_ascii_case(BEARER) {
        return Err(AuthError::MalformedHeader);
    }

    let token = &value[BEARER.len()..];
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

pub fn authenticate(headers: &HeaderMap, keys: &TokenKeys) -> Result<Claims, AuthError> {
    let token = extract_bearer(headers)?;
    keys.verify(token)
}

/// Middleware for `route_layer`: rejects the request with 403 unless it
/// carries a valid bearer token.
pub async fn require_bearer(
    State(keys): State<Arc<TokenKeys>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(request.headers(), &keys) {
        Ok(claims) => {
            tracing::debug!(subject = %claims.sub, "Bearer token accepted");
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(reason) => {
            tracing::warn!(
                request_id = %request_id(request.headers()),
                path = %request.uri().path(),
                reason = %reason,
                "Bearer token rejected"
            );
            ApiError::Forbidden.into_response()
        }
    }
}
