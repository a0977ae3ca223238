use thiserror::Error;

/// Errors raised inside the cache tiers. They never leave the cache layer.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to encode or decode cache entry: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("shared cache backend error: {0}")]
    Backend(String),

    #[error("shared cache unavailable")]
    Unavailable,
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Backend(err.to_string())
    }
}
