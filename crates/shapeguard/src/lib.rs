//! Validate JSON payloads against per-endpoint shape schemas.
//!
//! # Crate Structure
//!
//! - [`schema`] - Schema normalization and the structural comparator
//! - [`lookup`] - Endpoint resolution over pluggable stores and caches

/// Re-export schema types.
pub mod schema {
    pub use shapeguard_schema::*;
}

/// Re-export lookup types.
pub mod lookup {
    pub use shapeguard_lookup::*;
}
