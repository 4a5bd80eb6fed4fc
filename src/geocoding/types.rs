//! Query, result, and provider wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The two query shapes the gateway accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodeQuery {
    /// Free-text address search.
    Text { query: String },
    /// Reverse lookup from string-encoded coordinates.
    Coordinates { lat: String, lon: String },
}

impl GeocodeQuery {
    pub fn mode(&self) -> Mode {
        match self {
            GeocodeQuery::Text { .. } => Mode::Search,
            GeocodeQuery::Coordinates { .. } => Mode::Geocode,
        }
    }
}

/// Upstream protocol selector. Each query shape maps to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Search,
    Geocode,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Search => "search",
            Mode::Geocode => "geocode",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified address record, whichever upstream mode answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAddress {
    #[serde(rename = "address")]
    pub formatted_address: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

/// One candidate from the address cleaning endpoint.
///
/// The provider sends many more fields (postal code, region, quality codes);
/// only the display string and coordinates are read.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct CleanedAddress {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub geo_lat: Option<Value>,
    #[serde(default)]
    pub geo_lon: Option<Value>,
}

/// Envelope returned by the geolocate endpoint.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Suggestions {
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Suggestion {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub data: Option<SuggestionData>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SuggestionData {
    #[serde(default)]
    pub geo_lat: Option<Value>,
    #[serde(default)]
    pub geo_lon: Option<Value>,
}
