//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn a validated configuration into live components
//! - Fail fast when any component cannot be built
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Everything here is built once and is immutable afterwards
//! - The listener is bound by the caller, after this succeeds

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::api::ApiState;
use crate::auth::{TokenKeys, UserStore};
use crate::config::GatewayConfig;
use crate::docs::Docs;
use crate::geocoding::{GatewayError, GeocodingGateway};
use crate::proxy::{BackendAddressError, Forwarder};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid token settings: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("geocoding gateway: {0}")]
    Geocoding(#[from] GatewayError),

    #[error(transparent)]
    Backend(#[from] BackendAddressError),
}

/// Everything the HTTP layer needs, built from config.
#[derive(Debug, Clone)]
pub struct Components {
    pub api: ApiState,
    pub forwarder: Forwarder,
    pub docs: Docs,
}

pub fn build(config: &GatewayConfig) -> Result<Components, StartupError> {
    let tokens = TokenKeys::from_config(&config.auth)?;
    tracing::debug!(algorithm = ?tokens.algorithm(), "Token keys ready");

    let upstream_timeout = config.timeouts.upstream_secs.map(Duration::from_secs);
    let geocoder = GeocodingGateway::from_config(&config.geocoding, upstream_timeout)?;

    let forwarder = Forwarder::new(&config.backend.address)?;
    tracing::info!(backend = %forwarder.authority(), "Backend configured");

    Ok(Components {
        api: ApiState {
            geocoder: Arc::new(geocoder),
            tokens: Arc::new(tokens),
            users: UserStore::new(config.auth.password_cost),
        },
        forwarder,
        docs: Docs::new(&config.docs.spec_path),
    })
}
