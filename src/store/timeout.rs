//! Deadline wrapper so a wedged store degrades to a transport error.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time;

use super::{CacheStore, StoreError, StoreResult};

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Applies a timeout to every call on the wrapped store.
#[derive(Debug)]
pub struct TimeoutStore<S> {
    inner: S,
    timeout: Duration,
}

impl<S: CacheStore> TimeoutStore<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl<S: CacheStore> CacheStore for TimeoutStore<S> {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        time::timeout(self.timeout, self.inner.get(key))
            .await
            .map_err(|_| StoreError::Timeout(self.timeout))?
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> StoreResult<()> {
        time::timeout(self.timeout, self.inner.set(key, value, ttl))
            .await
            .map_err(|_| StoreError::Timeout(self.timeout))?
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
