//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace span, timeout)
//!     → dispatch (routing::Classifier decides once)
//!         → docs | api router | proxy::Forwarder
//!     → response.rs (hop-by-hop hygiene on the passthrough path)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::HttpServer;
