//! Endpoint schema resolution and payload validation.
//!
//! [`SchemaLookup`] resolves an endpoint identifier to its stored schema
//! through a cache-then-store chain, compares the caller's payload against
//! it, and returns the verdict together with the resolved schema.
//!
//! Stores and caches are injected as trait objects. In-process
//! implementations are provided for tests and for the CLI.

pub mod cache;
pub mod config;
pub mod directory;
pub mod endpoint;
pub mod error;
pub mod lookup;
pub mod store;

pub use cache::{MemoryCache, NoCache, SchemaCache};
pub use config::{DirectoryConfig, LookupConfig};
pub use directory::DirectoryStore;
pub use endpoint::EndpointId;
pub use error::{LookupError, Result};
pub use lookup::{SchemaLookup, ValidationReport, ValidationRequest};
pub use store::{MemoryStore, SchemaStore};
