//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Content backend that receives every unclaimed request.
    pub backend: BackendConfig,

    /// Token signing and password hashing.
    pub auth: AuthConfig,

    /// Upstream geocoding provider.
    pub geocoding: GeocodingConfig,

    /// Local documentation assets.
    pub docs: DocsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Backend content server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend base URL (e.g., "http://hugo:1313"). Resolved once at startup.
    pub address: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            address: "http://hugo:1313".to_string(),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared HMAC secret used to sign and verify bearer tokens.
    pub jwt_secret: String,

    /// Declared signing algorithm (HS256, HS384 or HS512).
    pub algorithm: String,

    /// Lifetime of issued tokens in seconds.
    pub token_ttl_secs: u64,

    /// bcrypt work factor for stored passwords.
    pub password_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            // WARNING: This is a placeholder! Override via GEO_GATEWAY_JWT_SECRET.
            jwt_secret: "CHANGE_ME_IN_PRODUCTION".to_string(),
            algorithm: "HS256".to_string(),
            token_ttl_secs: 24 * 60 * 60,
            password_cost: bcrypt::DEFAULT_COST,
        }
    }
}

/// Upstream geocoding provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeocodingConfig {
    /// Free-text address cleaning endpoint.
    pub search_url: String,

    /// Reverse geocoding (coordinates to address) endpoint.
    pub geocode_url: String,

    /// API key sent as `Authorization: Token <key>`.
    pub api_key: String,

    /// Secret sent as `X-Secret` on text search calls.
    pub secret_key: String,

    /// Honor HTTP(S)_PROXY from the environment for upstream calls.
    pub system_proxy: bool,

    /// Alternate hosts for contract testing.
    pub test_mode: TestModeConfig,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            search_url: "https://cleaner.dadata.ru/api/v1/clean/address".to_string(),
            geocode_url: "https://suggestions.dadata.ru/suggestions/api/4_1/rs/geolocate/address"
                .to_string(),
            api_key: String::new(),
            secret_key: String::new(),
            system_proxy: true,
            test_mode: TestModeConfig::default(),
        }
    }
}

/// Substitutes fixed alternate hosts for both upstream modes when enabled.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TestModeConfig {
    pub enabled: bool,
    pub search_url: Option<String>,
    pub geocode_url: Option<String>,
}

/// Documentation asset configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Path to the OpenAPI document served under `/docs`.
    pub spec_path: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            spec_path: "./docs/swagger.json".to_string(),
        }
    }
}

/// Timeout configuration. Unset means no deadline.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for one inbound request, in seconds.
    pub request_secs: Option<u64>,

    /// Deadline for a single upstream geocoding call, in seconds.
    pub upstream_secs: Option<u64>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

impl GeocodingConfig {
    /// Endpoint used for text search, honoring test mode.
    pub fn effective_search_url(&self) -> &str {
        match &self.test_mode.search_url {
            Some(url) if self.test_mode.enabled => url,
            _ => &self.search_url,
        }
    }

    /// Endpoint used for coordinate lookups, honoring test mode.
    pub fn effective_geocode_url(&self) -> &str {
        match &self.test_mode.geocode_url {
            Some(url) if self.test_mode.enabled => url,
            _ => &self.geocode_url,
        }
    }
}
