//! Key-value store seam used by the retrieval engine.

pub mod error;
pub mod memory;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod timeout;

#[cfg(test)]
mod tests;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
#[cfg(any(test, feature = "mock"))]
pub use mock::{FailingStore, RecordingStore, StoreCall};
pub use timeout::TimeoutStore;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

#[async_trait]
/// A shared key-value store client (memcached-like). Must be safe for concurrent use.
pub trait CacheStore: Send + Sync {
    /// Returns `Ok(None)` on a miss; `Err` only for transport failures.
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Stores `value` under `key`. A zero `ttl` means no expiry.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> StoreResult<()>;

    fn name(&self) -> &'static str;
}

#[async_trait]
impl<S: CacheStore + ?Sized> CacheStore for Arc<S> {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> StoreResult<()> {
        (**self).set(key, value, ttl).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
