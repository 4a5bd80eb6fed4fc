//! Request builders and response parsers for both upstream modes.
//!
//! Everything here is pure: bytes in, addresses out. The client in
//! `client.rs` owns the I/O.
//!
//! # Lossy policies
//! - [`decode_or_empty`]: a 2xx body that does not decode is treated as
//!   "no candidates" instead of an error.
//! - [`parse_coordinate_lossy`]: a coordinate that is missing or does not
//!   parse becomes `0.0`. The candidate itself is always kept.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::types::{CleanedAddress, Mode, NormalizedAddress, Suggestions};

/// Text search body: a single-element array holding the query.
pub fn search_body(query: &str) -> Value {
    json!([query])
}

/// Coordinate lookup body: string-encoded `lat`/`lon`.
pub fn geocode_body(lat: &str, lon: &str) -> Value {
    json!({ "lat": lat, "lon": lon })
}

/// Decode `bytes` as `T`, falling back to `T::default()` on any decode error.
pub fn decode_or_empty<T>(mode: Mode, bytes: &[u8]) -> T
where
    T: DeserializeOwned + Default,
{
    match serde_json::from_slice(bytes) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!(
                mode = %mode,
                error = %e,
                body_len = bytes.len(),
                "Upstream body did not decode, returning no candidates"
            );
            T::default()
        }
    }
}

/// Parse a provider coordinate. Decimal strings and JSON numbers are
/// accepted; anything else, including non-finite values, yields `0.0`.
pub fn parse_coordinate_lossy(raw: Option<&Value>) -> f64 {
    let parsed = match raw {
        Some(Value::String(s)) => s.parse::<f64>().ok(),
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Normalize a text search response.
pub fn normalize_search(bytes: &[u8]) -> Vec<NormalizedAddress> {
    let candidates: Vec<CleanedAddress> = decode_or_empty(Mode::Search, bytes);

    candidates
        .into_iter()
        .map(|c| NormalizedAddress {
            formatted_address: c.result.unwrap_or_default(),
            latitude: parse_coordinate_lossy(c.geo_lat.as_ref()),
            longitude: parse_coordinate_lossy(c.geo_lon.as_ref()),
        })
        .collect()
}

/// Normalize a coordinate lookup response.
pub fn normalize_geocode(bytes: &[u8]) -> Vec<NormalizedAddress> {
    let envelope: Suggestions = decode_or_empty(Mode::Geocode, bytes);

    envelope
        .suggestions
        .into_iter()
        .map(|s| {
            let data = s.data.unwrap_or_default();
            NormalizedAddress {
                formatted_address: s.value.unwrap_or_default(),
                latitude: parse_coordinate_lossy(data.geo_lat.as_ref()),
                longitude: parse_coordinate_lossy(data.geo_lon.as_ref()),
            }
        })
        .collect()
}

/// Dispatch to the parser for `mode`.
pub fn normalize(mode: Mode, bytes: &[u8]) -> Vec<NormalizedAddress> {
    match mode {
        Mode::Search => normalize_search(bytes),
        Mode::Geocode => normalize_geocode(bytes),
    }
}
