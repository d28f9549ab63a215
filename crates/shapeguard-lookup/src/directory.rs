use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use shapeguard_schema::SchemaDocument;

use crate::config::DirectoryConfig;
use crate::endpoint::EndpointId;
use crate::error::{LookupError, Result};
use crate::store::SchemaStore;

const SCHEMA_SUFFIX: &str = ".schema.json";
const INDEX_STEM: &str = "index";

/// Read-only store of `*.schema.json` files loaded from a directory tree.
///
/// The path of each file relative to the root, minus the suffix, is its
/// endpoint: `users/address.schema.json` serves `/users/address` and
/// `users/index.schema.json` serves `/users`. Documents are kept as text and
/// parsed per request, so a malformed file surfaces as a malformed-schema
/// verdict rather than a load failure.
#[derive(Debug)]
pub struct DirectoryStore {
    root: PathBuf,
    schemas: HashMap<EndpointId, String>,
    config: DirectoryConfig,
}

impl DirectoryStore {
    /// Load schemas from a directory.
    pub fn from_directory(path: &Path) -> Result<Self> {
        Self::from_directory_with_config(path, DirectoryConfig::default())
    }

    /// Load schemas from a directory with explicit limits.
    pub fn from_directory_with_config(path: &Path, config: DirectoryConfig) -> Result<Self> {
        let mut store = Self {
            root: path.to_path_buf(),
            schemas: HashMap::new(),
            config,
        };
        store.load_dir(path, &mut Vec::new())?;
        tracing::debug!(
            root = %path.display(),
            schemas = store.schemas.len(),
            "loaded schema directory"
        );
        Ok(store)
    }

    fn load_dir(&mut self, dir: &Path, prefix: &mut Vec<String>) -> Result<()> {
        let mut entries = std::fs::read_dir(dir)
            .map_err(|err| LookupError::LoadFailed(format!("{}: {err}", dir.display())))?
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|err| LookupError::LoadFailed(err.to_string()))?;
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy().into_owned();
            let is_schema_file = file_name.ends_with(SCHEMA_SUFFIX);
            let entry_path = entry.path();
            let path_metadata = std::fs::symlink_metadata(&entry_path)
                .map_err(|err| LookupError::LoadFailed(err.to_string()))?;
            let file_type = path_metadata.file_type();

            if file_type.is_symlink() {
                if is_schema_file {
                    return Err(LookupError::LoadFailed(format!(
                        "refusing to load schema symlink: {}",
                        entry_path.display()
                    )));
                }
                continue;
            }

            if file_type.is_dir() {
                prefix.push(file_name);
                self.load_dir(&entry_path, prefix)?;
                prefix.pop();
                continue;
            }

            if !file_type.is_file() || !is_schema_file {
                continue;
            }

            let endpoint = endpoint_for(prefix, &file_name)?;
            if self.schemas.contains_key(&endpoint) {
                return Err(LookupError::LoadFailed(format!(
                    "duplicate schema for endpoint {endpoint}: {}",
                    entry_path.display()
                )));
            }

            if self.schemas.len() >= self.config.max_schemas_from_directory {
                return Err(LookupError::LoadFailed(format!(
                    "schema count exceeds configured max ({})",
                    self.config.max_schemas_from_directory
                )));
            }

            let content = self.read_schema_file(&entry_path, &path_metadata)?;
            self.schemas.insert(endpoint, content);
        }

        Ok(())
    }

    fn read_schema_file(&self, path: &Path, path_metadata: &std::fs::Metadata) -> Result<String> {
        let file = std::fs::File::open(path).map_err(|err| {
            LookupError::LoadFailed(format!("failed opening schema {}: {err}", path.display()))
        })?;
        let opened_metadata = file
            .metadata()
            .map_err(|err| LookupError::LoadFailed(err.to_string()))?;

        #[cfg(unix)]
        {
            if !same_file_identity(path_metadata, &opened_metadata) {
                return Err(LookupError::LoadFailed(format!(
                    "schema file changed during load: {}",
                    path.display()
                )));
            }
        }
        #[cfg(not(unix))]
        let _ = path_metadata;

        let max_bytes = self.config.max_schema_file_size;
        if opened_metadata.len() > max_bytes as u64 {
            return Err(LookupError::LoadFailed(format!(
                "schema file too large ({} bytes): {}",
                opened_metadata.len(),
                path.display()
            )));
        }

        let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
        let mut bytes = Vec::new();
        file.take(read_limit).read_to_end(&mut bytes).map_err(|err| {
            LookupError::LoadFailed(format!("failed reading schema {}: {err}", path.display()))
        })?;
        if bytes.len() > max_bytes {
            return Err(LookupError::LoadFailed(format!(
                "schema file too large while reading: {}",
                path.display()
            )));
        }

        // Undecodable bytes stay scoped to this endpoint's verdict.
        match String::from_utf8(bytes) {
            Ok(content) => Ok(content),
            Err(err) => {
                tracing::warn!(path = %path.display(), "schema file is not valid UTF-8");
                Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
            }
        }
    }

    /// Directory the store was loaded from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Registered endpoints, sorted.
    pub fn endpoints(&self) -> Vec<EndpointId> {
        let mut endpoints: Vec<EndpointId> = self.schemas.keys().cloned().collect();
        endpoints.sort_unstable();
        endpoints
    }

    pub fn has_schema(&self, endpoint: &EndpointId) -> bool {
        self.schemas.contains_key(endpoint)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[async_trait]
impl SchemaStore for DirectoryStore {
    async fn fetch(&self, endpoint: &EndpointId) -> Result<Option<SchemaDocument>> {
        Ok(self
            .schemas
            .get(endpoint)
            .map(|text| SchemaDocument::Text(text.clone())))
    }
}

fn endpoint_for(prefix: &[String], file_name: &str) -> Result<EndpointId> {
    let stem = &file_name[..file_name.len() - SCHEMA_SUFFIX.len()];
    if stem.is_empty() {
        return Err(LookupError::LoadFailed(format!(
            "schema file has no endpoint name: {file_name}"
        )));
    }

    let mut segments: Vec<&str> = prefix.iter().map(String::as_str).collect();
    if stem != INDEX_STEM {
        segments.push(stem);
    }
    EndpointId::from_segments(segments)
}

#[cfg(unix)]
fn same_file_identity(
    path_metadata: &std::fs::Metadata,
    opened_metadata: &std::fs::Metadata,
) -> bool {
    use std::os::unix::fs::MetadataExt;
    path_metadata.dev() == opened_metadata.dev() && path_metadata.ino() == opened_metadata.ino()
}
