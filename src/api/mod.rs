//! Internal API subsystem.
//!
//! # Data Flow
//! ```text
//! /api/*  (from the dispatcher)
//!     → open group:  /api/ (probe), /api/login, /api/register
//!     → gated group: /api/address/search, /api/address/geocode
//!                    (auth::require_bearer runs first)
//!     → handlers.rs → geocoding / users / tokens
//!     → JSON response or ApiError
//! ```
//!
//! # Design Decisions
//! - Group membership is fixed when the router is built
//! - Non-POST on the JSON routes is 405, unknown paths are 404; nothing
//!   under /api reaches the backend

pub mod handlers;
pub mod models;

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{any, post},
    Router,
};

use crate::auth::{require_bearer, TokenKeys, UserStore};
use crate::geocoding::GeocodingGateway;

/// Shared handles for the API handlers.
#[derive(Debug, Clone)]
pub struct ApiState {
    pub geocoder: Arc<GeocodingGateway>,
    pub tokens: Arc<TokenKeys>,
    pub users: UserStore,
}

pub fn router(state: ApiState) -> Router {
    let gated = Router::new()
        .route(
            "/api/address/search",
            post(handlers::search).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/address/geocode",
            post(handlers::geocode).fallback(handlers::method_not_allowed),
        )
        .route_layer(from_fn_with_state(state.tokens.clone(), require_bearer));

    Router::new()
        .route("/api/", any(handlers::hello))
        .route(
            "/api/login",
            post(handlers::login).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/register",
            post(handlers::register).fallback(handlers::method_not_allowed),
        )
        .merge(gated)
        .fallback(handlers::not_found)
        .with_state(state)
}
