//! Edge gateway library: docs, authenticated geocoding API, backend passthrough.

pub mod api;
pub mod auth;
pub mod config;
pub mod docs;
pub mod error;
pub mod geocoding;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod routing;

pub use config::schema::GatewayConfig;
pub use error::{ApiError, ApiResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
