//! Non-fatal cache errors and where they are sent.

use thiserror::Error;
use tracing::warn;

use crate::codec::CodecError;
use crate::store::StoreError;

/// A cache problem recovered from locally. Never returned to callers.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The store could not be read; the request continues as a miss.
    #[error("cache lookup failed for {key}: {source}")]
    Transport {
        key: String,
        #[source]
        source: StoreError,
    },

    /// A background write was rejected by the store.
    #[error("cache write failed for {key}: {source}")]
    Write {
        key: String,
        #[source]
        source: StoreError,
    },

    /// A stored value failed to decode; treated as a miss.
    #[error("corrupt cache value at {key}: {source}")]
    Corruption {
        key: String,
        #[source]
        source: CodecError,
    },

    /// An outcome could not be encoded; the write was skipped.
    #[error("failed to encode cache entry for {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: CodecError,
    },
}

impl CacheError {
    /// Whether the store itself failed, as opposed to a bad value.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, CacheError::Transport { .. } | CacheError::Write { .. })
    }

    pub fn key(&self) -> &str {
        match self {
            CacheError::Transport { key, .. }
            | CacheError::Write { key, .. }
            | CacheError::Corruption { key, .. }
            | CacheError::Encode { key, .. } => key,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CacheError::Transport { .. } => "transport",
            CacheError::Write { .. } => "write",
            CacheError::Corruption { .. } => "corruption",
            CacheError::Encode { .. } => "encode",
        }
    }
}

/// Receives non-fatal cache errors. Called inline; implementations must not block.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &CacheError);
}

impl<F> ErrorReporter for F
where
    F: Fn(&CacheError) + Send + Sync,
{
    fn report(&self, error: &CacheError) {
        self(error)
    }
}

/// Logs every reported error at `WARN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, error: &CacheError) {
        warn!(
            key = error.key(),
            kind = error.kind(),
            error = %error,
            "Cache error (serving without cache)"
        );
    }
}
