//! Resource producers behind the cache.

pub mod directory;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use directory::DirectoryBackend;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockBackend;

use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;

use crate::resource::FetchResult;

#[async_trait]
/// Slow producer of resources, consulted on cache misses and refreshes.
pub trait Backend: Send + Sync {
    async fn fetch(&self, identifier: &str) -> FetchResult;

    /// JSON description of this backend's configuration. Hashed into cache keys so that
    /// differently configured backends never share entries.
    fn descriptor(&self) -> Value;
}

/// Adapts an async closure into a [`Backend`].
pub struct FnBackend<F> {
    descriptor: Value,
    fetch: F,
}

impl<F> FnBackend<F> {
    pub fn new(descriptor: Value, fetch: F) -> Self {
        Self { descriptor, fetch }
    }
}

#[async_trait]
impl<F, Fut> Backend for FnBackend<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = FetchResult> + Send,
{
    async fn fetch(&self, identifier: &str) -> FetchResult {
        (self.fetch)(identifier.to_string()).await
    }

    fn descriptor(&self) -> Value {
        self.descriptor.clone()
    }
}

impl<F> std::fmt::Debug for FnBackend<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnBackend")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}
