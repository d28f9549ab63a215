use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shapeguard_schema::{Comparator, ComparisonResult, Outcome, SchemaDocument};

use crate::cache::{NoCache, SchemaCache};
use crate::config::LookupConfig;
use crate::endpoint::EndpointId;
use crate::error::Result;
use crate::store::SchemaStore;

/// Inbound validation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    pub endpoint_identifier: EndpointId,
    pub payload: Value,
}

/// Comparison verdict plus the schema it was checked against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    #[serde(flatten)]
    pub result: ComparisonResult,
    /// Resolved schema document; absent when no schema was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

impl ValidationReport {
    pub fn is_match(&self) -> bool {
        self.result.is_match
    }

    pub fn outcome(&self) -> Outcome {
        self.result.outcome
    }
}

/// Resolves endpoint schemas through a cache and a store, then compares
/// payloads against them.
pub struct SchemaLookup {
    store: Arc<dyn SchemaStore>,
    cache: Arc<dyn SchemaCache>,
    comparator: Comparator,
    config: LookupConfig,
}

impl SchemaLookup {
    /// Lookup over a store with no cache and default config.
    pub fn new(store: Arc<dyn SchemaStore>) -> Self {
        Self::with_cache(store, Arc::new(NoCache))
    }

    /// Lookup over a store and cache with default config.
    pub fn with_cache(store: Arc<dyn SchemaStore>, cache: Arc<dyn SchemaCache>) -> Self {
        Self::with_config(store, cache, LookupConfig::default())
    }

    /// Lookup over a store and cache with explicit config.
    pub fn with_config(
        store: Arc<dyn SchemaStore>,
        cache: Arc<dyn SchemaCache>,
        config: LookupConfig,
    ) -> Self {
        Self {
            store,
            cache,
            comparator: Comparator::with_config(config.compare),
            config,
        }
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Resolve the schema document for an endpoint, cache first.
    ///
    /// Cache failures degrade to a store fetch. Store failures are returned.
    pub async fn resolve(&self, endpoint: &EndpointId) -> Result<Option<SchemaDocument>> {
        let key = self.cache_key(endpoint);

        match self.cache.get(&key).await {
            Ok(Some(text)) => {
                tracing::debug!(%endpoint, "schema cache hit");
                return Ok(Some(SchemaDocument::Text(text)));
            }
            Ok(None) => tracing::debug!(%endpoint, "schema cache miss"),
            Err(err) => tracing::warn!(%endpoint, error = %err, "schema cache read failed"),
        }

        let Some(document) = self.store.fetch(endpoint).await? else {
            tracing::debug!(%endpoint, "no schema registered");
            return Ok(None);
        };

        if let Err(err) = self
            .cache
            .set(&key, document.to_text(), self.config.cache_ttl)
            .await
        {
            tracing::warn!(%endpoint, error = %err, "schema cache write failed");
        }

        Ok(Some(document))
    }

    /// Validate a payload against the schema registered for an endpoint.
    ///
    /// Every verdict, including a missing or malformed schema or an internal
    /// comparison failure, is returned as a report. A failing store is not a
    /// verdict about the payload and comes back as `Err(LookupError::Store)`;
    /// cache failures are logged and read as misses.
    pub async fn validate(&self, endpoint: &EndpointId, payload: &Value) -> Result<ValidationReport> {
        let Some(document) = self.resolve(endpoint).await? else {
            return Ok(ValidationReport {
                result: ComparisonResult::schema_not_found(),
                schema: None,
            });
        };

        let result = self.comparator.compare_document(&document, payload);
        tracing::debug!(
            %endpoint,
            outcome = %result.outcome,
            differences = result.differences.len(),
            "payload validated"
        );

        Ok(ValidationReport {
            result,
            schema: Some(document.to_value()),
        })
    }

    pub async fn handle(&self, request: &ValidationRequest) -> Result<ValidationReport> {
        self.validate(&request.endpoint_identifier, &request.payload)
            .await
    }

    /// Drop the cached schema for an endpoint, best-effort.
    pub async fn invalidate(&self, endpoint: &EndpointId) {
        if let Err(err) = self.cache.delete(&self.cache_key(endpoint)).await {
            tracing::warn!(%endpoint, error = %err, "schema cache delete failed");
        }
    }

    fn cache_key(&self, endpoint: &EndpointId) -> String {
        format!("{}{}", self.config.cache_key_prefix, endpoint)
    }
}
