//! Request and response bodies of the internal API.

use serde::{Deserialize, Serialize};

use crate::geocoding::{GeocodeQuery, NormalizedAddress};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

impl From<SearchRequest> for GeocodeQuery {
    fn from(req: SearchRequest) -> Self {
        GeocodeQuery::Text { query: req.query }
    }
}

/// Coordinates arrive as strings and are forwarded as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodeRequest {
    pub lat: String,
    pub lng: String,
}

impl From<GeocodeRequest> for GeocodeQuery {
    fn from(req: GeocodeRequest) -> Self {
        GeocodeQuery::Coordinates {
            lat: req.lat,
            lon: req.lng,
        }
    }
}

/// Shared response shape of both geocoding routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressesResponse {
    pub addresses: Vec<NormalizedAddress>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Full header value, `Bearer <jwt>`.
    pub access_token: String,
}

impl TokenResponse {
    pub fn bearer(token: &str) -> Self {
        Self {
            access_token: format!("Bearer {token}"),
        }
    }
}
