use std::time::Duration;

use thiserror::Error;

/// Transport-level failures reported by a cache store. A miss is not an error.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("cache store unavailable: {0}")]
    Unavailable(String),

    #[error("cache store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("cache store error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
