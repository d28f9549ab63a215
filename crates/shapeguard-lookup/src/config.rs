use std::time::Duration;

use shapeguard_schema::CompareConfig;

/// Controls schema resolution and comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    /// Time-to-live for schemas written to the cache. `None` keeps them
    /// until evicted.
    pub cache_ttl: Option<Duration>,
    /// Prefix applied to endpoint identifiers to form cache keys.
    pub cache_key_prefix: String,
    /// Comparator limits.
    pub compare: CompareConfig,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Some(Duration::from_secs(3600)),
            cache_key_prefix: "schema:".to_string(),
            compare: CompareConfig::default(),
        }
    }
}

/// Limits applied when loading schemas from a directory tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryConfig {
    /// Maximum number of schemas loaded from a directory.
    pub max_schemas_from_directory: usize,
    /// Maximum bytes allowed per schema file.
    pub max_schema_file_size: usize,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            max_schemas_from_directory: 256,
            max_schema_file_size: 256 * 1024,
        }
    }
}
