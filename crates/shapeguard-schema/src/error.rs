/// Errors that can occur while preparing or walking a schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The schema document is not valid JSON.
    #[error("schema is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The walk descended deeper than the configured limit.
    #[error("maximum nesting depth {max} exceeded at path \"{path}\"")]
    DepthExceeded { max: usize, path: String },
}

pub type Result<T> = std::result::Result<T, SchemaError>;
