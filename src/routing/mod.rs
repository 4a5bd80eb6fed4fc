//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (ordered guard scan)
//!     → matcher.rs (evaluate match conditions)
//!     → Return: RouteClass (fallback when nothing matched)
//! ```
//!
//! # Design Decisions
//! - Guards fixed at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always yields the same class
//! - First match wins (insertion order)

pub mod matcher;
pub mod router;

pub use matcher::{Matcher, PathPrefixMatcher};
pub use router::{Classifier, RouteClass};
