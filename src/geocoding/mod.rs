//! Upstream geocoding subsystem.
//!
//! # Data Flow
//! ```text
//! GeocodeQuery::Text         → protocol::search_body  → POST search_url  (Token + X-Secret)
//! GeocodeQuery::Coordinates  → protocol::geocode_body → POST geocode_url (Token)
//!     → status check (non-2xx = GatewayError)
//!     → protocol::normalize (per-candidate, lossy coordinates)
//!     → Vec<NormalizedAddress>
//! ```
//!
//! # Design Decisions
//! - One query shape maps to exactly one protocol; the match is exhaustive
//! - Upstream hosts are resolved once at construction (test mode included)
//! - Failures collapse into `GatewayError`; callers never see provider detail
//! - A 2xx body that fails to decode yields zero candidates, not an error

pub mod client;
pub mod protocol;
pub mod types;

pub use client::{GatewayError, GeocodingGateway, UpstreamEndpoint};
pub use types::{GeocodeQuery, Mode, NormalizedAddress};
