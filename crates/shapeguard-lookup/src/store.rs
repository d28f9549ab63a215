use async_trait::async_trait;
use dashmap::DashMap;
use shapeguard_schema::SchemaDocument;

use crate::endpoint::EndpointId;
use crate::error::Result;

/// Keyed lookup of schema documents by endpoint.
///
/// Implementations may sit in front of a database, a file tree or memory;
/// callers only see the document or its absence.
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Fetch the schema registered for an endpoint.
    async fn fetch(&self, endpoint: &EndpointId) -> Result<Option<SchemaDocument>>;
}

/// In-memory schema store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    schemas: DashMap<EndpointId, SchemaDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the schema for an endpoint. Returns the previous
    /// document, if any.
    pub fn insert(
        &self,
        endpoint: EndpointId,
        document: impl Into<SchemaDocument>,
    ) -> Option<SchemaDocument> {
        self.schemas.insert(endpoint, document.into())
    }

    pub fn remove(&self, endpoint: &EndpointId) -> Option<SchemaDocument> {
        self.schemas.remove(endpoint).map(|(_, document)| document)
    }

    pub fn contains(&self, endpoint: &EndpointId) -> bool {
        self.schemas.contains_key(endpoint)
    }

    /// Registered endpoints, sorted.
    pub fn endpoints(&self) -> Vec<EndpointId> {
        let mut endpoints: Vec<EndpointId> =
            self.schemas.iter().map(|entry| entry.key().clone()).collect();
        endpoints.sort_unstable();
        endpoints
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[async_trait]
impl SchemaStore for MemoryStore {
    async fn fetch(&self, endpoint: &EndpointId) -> Result<Option<SchemaDocument>> {
        Ok(self
            .schemas
            .get(endpoint)
            .map(|entry| entry.value().clone()))
    }
}
