//! Backend passthrough subsystem.
//!
//! # Data Flow
//! ```text
//! Request classified as BackendPassthrough
//!     → rewrite scheme/authority to the backend, set Host
//!     → strip hop-by-hop headers, append X-Forwarded-For
//!     → hyper-util client (HTTP/1.1)
//!     → strip hop-by-hop headers from the response
//!     → status, headers, body relayed verbatim (streamed)
//! ```
//!
//! # Design Decisions
//! - Single fixed backend, parsed once at startup
//! - No retries: a failed forward is a 502 for that request only
//! - Response body streams through without buffering

pub mod forwarder;

pub use forwarder::{BackendAddressError, Forwarder};
