//! Structural comparison of JSON payloads against registered shape schemas.
//!
//! A schema document is normalized into a [`SchemaNode`] tree, then a payload
//! is walked against it. Every disagreement is reported as an addressed
//! difference entry (`.user.addresses[2].zip: Missing required property`),
//! and the walk never stops at the first failure.
//!
//! Objects are closed: every declared property is required and undeclared
//! properties are rejected, at every level.

pub mod compare;
pub mod config;
pub mod error;
pub mod node;
pub mod result;

pub use compare::{compare, compare_document, Comparator, REASON_PREFIXES};
pub use config::CompareConfig;
pub use error::{Result, SchemaError};
pub use node::{PrimitiveKind, SchemaDocument, SchemaNode};
pub use result::{ComparisonResult, Outcome};
