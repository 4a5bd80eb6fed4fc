//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! /api/register → users.rs (bcrypt hash, store)
//! /api/login    → users.rs (verify) → token.rs (issue) → "Bearer <jwt>"
//!
//! Gated request
//!     → gate.rs (extract bearer, verify via token.rs)
//!     → Claims in request extensions → handler
//!     → or 403 {"error":"403 Forbidden"}
//! ```
//!
//! # Design Decisions
//! - One shared secret signs and verifies; HMAC algorithms only
//! - Users live in memory for the life of the process
//! - Password hashing runs on the blocking pool

pub mod gate;
pub mod token;
pub mod users;

pub use gate::{authenticate, extract_bearer, require_bearer};
pub use token::{AuthError, Claims, TokenKeys};
pub use users::{Credential, UserError, UserStore, MAX_PASSWORD_COST, MIN_PASSWORD_COST};
