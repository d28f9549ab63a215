/// Errors raised by stores, caches and endpoint parsing.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The endpoint identifier is empty or otherwise unusable.
    #[error("invalid endpoint identifier: {0:?}")]
    InvalidEndpoint(String),

    /// Schema documents could not be loaded into a store.
    #[error("failed to load schema: {0}")]
    LoadFailed(String),

    /// The backing store failed while fetching.
    #[error("schema store error: {0}")]
    Store(String),

    /// The cache failed. Never fatal to a validation.
    #[error("schema cache error: {0}")]
    Cache(String),
}

pub type Result<T> = std::result::Result<T, LookupError>;
