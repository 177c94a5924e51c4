//! Test stores: one that records every call, one that fails on demand.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{CacheStore, MemoryStore, StoreError, StoreResult};

/// A call observed by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Get { key: String },
    Set { key: String, ttl: Duration, len: usize },
}

/// Memory-backed store that records calls and can delay lookups.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    calls: Mutex<Vec<StoreCall>>,
    get_delay: Duration,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `get` sleeps for `delay` before answering.
    pub fn with_get_delay(delay: Duration) -> Self {
        Self {
            get_delay: delay,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    pub fn get_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, StoreCall::Get { .. }))
            .count()
    }

    pub fn set_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, StoreCall::Set { .. }))
            .count()
    }

    /// `(key, ttl)` for every recorded `set`, in call order.
    pub fn sets(&self) -> Vec<(String, Duration)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                StoreCall::Set { key, ttl, .. } => Some((key.clone(), *ttl)),
                StoreCall::Get { .. } => None,
            })
            .collect()
    }

    /// Reads the stored value without recording a call.
    pub fn peek(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.peek(key)
    }

    /// Writes a raw value without recording a call.
    pub fn seed(&self, key: &str, bytes: Vec<u8>) {
        self.inner.insert(key, bytes, Duration::ZERO);
    }
}

#[async_trait]
impl CacheStore for RecordingStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        self.calls.lock().push(StoreCall::Get {
            key: key.to_string(),
        });
        if !self.get_delay.is_zero() {
            tokio::time::sleep(self.get_delay).await;
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> StoreResult<()> {
        self.calls.lock().push(StoreCall::Set {
            key: key.to_string(),
            ttl,
            len: value.len(),
        });
        self.inner.set(key, value, ttl).await
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Store whose `get` and/or `set` always fail with a transport error.
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_get: bool,
    fail_set: bool,
    attempts: AtomicUsize,
}

impl FailingStore {
    /// Both `get` and `set` fail.
    pub fn new() -> Self {
        Self {
            fail_get: true,
            fail_set: true,
            ..Self::default()
        }
    }

    pub fn failing_gets() -> Self {
        Self {
            fail_get: true,
            ..Self::default()
        }
    }

    pub fn failing_sets() -> Self {
        Self {
            fail_set: true,
            ..Self::default()
        }
    }

    /// Number of calls made, failed or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheStore for FailingStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_get {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> StoreResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_set {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        self.inner.set(key, value, ttl).await
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}
