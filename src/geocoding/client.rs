//! HTTP client for the upstream geocoding provider.

use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use super::protocol;
use super::types::{GeocodeQuery, Mode, NormalizedAddress};
use crate::config::GeocodingConfig;
use crate::observability::metrics;

/// Every way an upstream call can fail. Callers surface all of them as one
/// opaque internal error; the detail is for local logs only.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{mode} upstream request failed: {source}")]
    Transport {
        mode: Mode,
        #[source]
        source: reqwest::Error,
    },

    #[error("{mode} upstream timed out")]
    Timeout { mode: Mode },

    #[error("{mode} upstream returned status {status}")]
    Status { mode: Mode, status: StatusCode },

    #[error("invalid {field} '{value}': {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build upstream HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl GatewayError {
    fn from_reqwest(mode: Mode, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            GatewayError::Timeout { mode }
        } else {
            GatewayError::Transport { mode, source }
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        match self {
            GatewayError::Transport { mode, .. }
            | GatewayError::Timeout { mode }
            | GatewayError::Status { mode, .. } => Some(*mode),
            GatewayError::InvalidUrl { .. } | GatewayError::Client(_) => None,
        }
    }
}

/// A resolved upstream endpoint: target URL plus the headers it needs.
#[derive(Debug, Clone)]
pub struct UpstreamEndpoint {
    pub mode: Mode,
    pub url: Url,
    /// Extra secret header, sent only where the provider requires it.
    secret: Option<String>,
}

impl UpstreamEndpoint {
    fn parse(
        mode: Mode,
        field: &'static str,
        value: &str,
        secret: Option<String>,
    ) -> Result<Self, GatewayError> {
        let url = Url::parse(value).map_err(|source| GatewayError::InvalidUrl {
            field,
            value: value.to_string(),
            source,
        })?;
        Ok(Self { mode, url, secret })
    }
}

/// Translates [`GeocodeQuery`] values into provider calls and normalizes
/// whatever comes back.
///
/// Target hosts are fixed when the gateway is built. Test mode is read from
/// config at that moment and never consulted again.
#[derive(Debug, Clone)]
pub struct GeocodingGateway {
    http: Client,
    search: UpstreamEndpoint,
    geocode: UpstreamEndpoint,
    api_key: String,
}

impl GeocodingGateway {
    pub fn from_config(
        config: &GeocodingConfig,
        timeout: Option<Duration>,
    ) -> Result<Self, GatewayError> {
        let search = UpstreamEndpoint::parse(
            Mode::Search,
            "search_url",
            config.effective_search_url(),
            Some(config.secret_key.clone()),
        )?;
        let geocode = UpstreamEndpoint::parse(
            Mode::Geocode,
            "geocode_url",
            config.effective_geocode_url(),
            None,
        )?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build().map_err(GatewayError::Client)?;

        if config.test_mode.enabled {
            tracing::warn!(
                search = %search.url,
                geocode = %geocode.url,
                "Geocoding test mode enabled, using alternate upstream hosts"
            );
        }

        Ok(Self {
            http,
            search,
            geocode,
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self, mode: Mode) -> &UpstreamEndpoint {
        match mode {
            Mode::Search => &self.search,
            Mode::Geocode => &self.geocode,
        }
    }

    /// Run `query` against the endpoint for its mode.
    pub async fn lookup(&self, query: &GeocodeQuery) -> Result<Vec<NormalizedAddress>, GatewayError> {
        let body = match query {
            GeocodeQuery::Text { query } => protocol::search_body(query),
            GeocodeQuery::Coordinates { lat, lon } => protocol::geocode_body(lat, lon),
        };
        let mode = query.mode();

        let result = self.call(self.endpoint(mode), &body).await;
        if let Err(e) = &result {
            tracing::error!(mode = %mode, error = %e, "Geocoding upstream call failed");
            metrics::record_upstream_failure(mode.as_str());
        }

        let bytes = result?;
        let addresses = protocol::normalize(mode, &bytes);
        tracing::debug!(mode = %mode, candidates = addresses.len(), "Geocoding lookup complete");
        Ok(addresses)
    }

    pub async fn search(&self, query: &str) -> Result<Vec<NormalizedAddress>, GatewayError> {
        self.lookup(&GeocodeQuery::Text {
            query: query.to_string(),
        })
        .await
    }

    pub async fn geocode(&self, lat: &str, lon: &str) -> Result<Vec<NormalizedAddress>, GatewayError> {
        self.lookup(&GeocodeQuery::Coordinates {
            lat: lat.to_string(),
            lon: lon.to_string(),
        })
        .await
    }

    async fn call(&self, endpoint: &UpstreamEndpoint, body: &Value) -> Result<Vec<u8>, GatewayError> {
        let mode = endpoint.mode;

        let mut request = self
            .http
            .post(endpoint.url.clone())
            .header(header::ACCEPT, "application/json")
            .header(header::AUTHORIZATION, format!("Token {}", self.api_key))
            .json(body);
        if let Some(secret) = &endpoint.secret {
            request = request.header("X-Secret", secret);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::from_reqwest(mode, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status { mode, status });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::from_reqwest(mode, e))?;
        Ok(bytes.to_vec())
    }
}
