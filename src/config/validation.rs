//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and URLs before any subsystem uses them
//! - Reject signing setups the gate cannot verify with a shared secret
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::auth::token::MAX_TOKEN_TTL_SECS;
use crate::auth::users::{MAX_PASSWORD_COST, MIN_PASSWORD_COST};
use crate::config::schema::GatewayConfig;

/// HMAC algorithms usable with a shared secret.
pub const SUPPORTED_ALGORITHMS: &[&str] = &["HS256", "HS384", "HS512"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    match Url::parse(&config.backend.address) {
        Ok(url) if url.scheme() != "http" => errors.push(ValidationError::new(
            "backend.address",
            format!("unsupported scheme '{}', expected http", url.scheme()),
        )),
        Ok(url) if url.host_str().is_none() => {
            errors.push(ValidationError::new("backend.address", "missing host"))
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::new("backend.address", e.to_string())),
    }

    if config.auth.jwt_secret.trim().is_empty() {
        errors.push(ValidationError::new("auth.jwt_secret", "must not be empty"));
    }

    if !SUPPORTED_ALGORITHMS.contains(&config.auth.algorithm.as_str()) {
        errors.push(ValidationError::new(
            "auth.algorithm",
            format!(
                "'{}' is not one of {}",
                config.auth.algorithm,
                SUPPORTED_ALGORITHMS.join(", ")
            ),
        ));
    }

    if !(1..=MAX_TOKEN_TTL_SECS).contains(&config.auth.token_ttl_secs) {
        errors.push(ValidationError::new(
            "auth.token_ttl_secs",
            format!("must be between 1 and {}", MAX_TOKEN_TTL_SECS),
        ));
    }

    if !(MIN_PASSWORD_COST..=MAX_PASSWORD_COST).contains(&config.auth.password_cost) {
        errors.push(ValidationError::new(
            "auth.password_cost",
            format!(
                "must be between {} and {}",
                MIN_PASSWORD_COST, MAX_PASSWORD_COST
            ),
        ));
    }

    let geo = &config.geocoding;
    check_url(&mut errors, "geocoding.search_url", &geo.search_url);
    check_url(&mut errors, "geocoding.geocode_url", &geo.geocode_url);

    if geo.test_mode.enabled {
        match &geo.test_mode.search_url {
            Some(url) => check_url(&mut errors, "geocoding.test_mode.search_url", url),
            None => errors.push(ValidationError::new(
                "geocoding.test_mode.search_url",
                "required when test mode is enabled",
            )),
        }
        match &geo.test_mode.geocode_url {
            Some(url) => check_url(&mut errors, "geocoding.test_mode.geocode_url", url),
            None => errors.push(ValidationError::new(
                "geocoding.test_mode.geocode_url",
                "required when test mode is enabled",
            )),
        }
    }

    if config.timeouts.request_secs == Some(0) {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }
    if config.timeouts.upstream_secs == Some(0) {
        errors.push(ValidationError::new("timeouts.upstream_secs", "must be > 0"));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "not a socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if let Err(e) = Url::parse(value) {
        errors.push(ValidationError::new(field, format!("'{}': {}", value, e)));
    }
}
