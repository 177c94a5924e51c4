//! Retrieval-strategy engine.
//!
//! [`Memsource`] composes a [`CacheStore`] and a [`Backend`] into a single
//! `get(identifier) -> FetchResult` operation using one of three strategies ([`Mode`]):
//!
//! | Mode | Cache hit | Cache miss |
//! |------|-----------|------------|
//! | `readthrough` | return decoded entry | fetch, return, write in background |
//! | `race` | whichever of cache/backend answers first | backend answer, reconciled after both finish |
//! | `relay` | return entry; refresh in background if stale | fetch, stamp `expires`, write in background |
//!
//! Store failures never fail a request. They go to the configured [`ErrorReporter`] and the
//! request continues as a miss.

pub mod mode;
mod race;
mod readthrough;
mod relay;
pub mod report;
mod tasks;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


#[cfg(any(test, feature = "mock"))]
pub use mock::CollectingReporter;
pub use mode::{Mode, ModeParseError};
pub use report::{CacheError, ErrorReporter, TracingReporter};

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument};

use crate::backend::Backend;
use crate::classify::Classifier;
use crate::codec::CacheEntry;
use crate::config::Config;
use crate::constants::DEFAULT_KEY_PREFIX;
use crate::expiry::{Expiry, ExpiryResolver, Partitioner};
use crate::hashing::KeyBuilder;
use crate::resource::FetchResult;
use crate::store::CacheStore;
use tasks::BackgroundTasks;

/// Outcome of reading a key from the store.
#[derive(Debug)]
pub(crate) enum Lookup {
    /// Decoded entry plus the raw value it came from.
    Hit(CacheEntry, Vec<u8>),
    Miss,
    /// Value present but undecodable (already reported).
    Corrupt(Vec<u8>),
    /// Store failed (already reported).
    Unavailable,
}

struct Inner {
    store: Arc<dyn CacheStore>,
    backend: Arc<dyn Backend>,
    mode: Mode,
    keys: KeyBuilder,
    expiry: ExpiryResolver,
    classifier: Classifier,
    reporter: Arc<dyn ErrorReporter>,
    tasks: Arc<BackgroundTasks>,
}

/// Cache-augmented source. Cheap to clone; clones share the store, backend and task tracker.
#[derive(Clone)]
pub struct Memsource {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Memsource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memsource")
            .field("mode", &self.inner.mode)
            .field("store", &self.inner.store.name())
            .field("keys", &self.inner.keys)
            .field("expiry", &self.inner.expiry)
            .field("pending_tasks", &self.inner.tasks.pending())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Memsource`]. Only the store and the backend are required.
pub struct MemsourceBuilder {
    store: Arc<dyn CacheStore>,
    backend: Arc<dyn Backend>,
    mode: Mode,
    key_prefix: String,
    expires: Expiry,
    fresh_ttl: Expiry,
    partitioner: Option<Partitioner>,
    classifier: Classifier,
    reporter: Arc<dyn ErrorReporter>,
}

impl MemsourceBuilder {
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Store TTL (`expires` option).
    pub fn expires(mut self, expires: impl Into<Expiry>) -> Self {
        self.expires = expires.into();
        self
    }

    /// Relay freshness TTL (`ttl` option). Ignored by the other modes.
    pub fn fresh_ttl(mut self, fresh_ttl: impl Into<Expiry>) -> Self {
        self.fresh_ttl = fresh_ttl.into();
        self
    }

    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Replaces the host-based partition function used for partitioned expiry.
    pub fn partitioner<F>(mut self, partitioner: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.partitioner = Some(Arc::new(partitioner));
        self
    }

    pub fn classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn build(self) -> Memsource {
        let mut expiry = ExpiryResolver::new(self.expires, self.fresh_ttl);
        if let Some(partitioner) = self.partitioner {
            expiry = expiry.with_shared_partitioner(partitioner);
        }
        let keys = KeyBuilder::new(self.key_prefix, &self.backend.descriptor());

        Memsource {
            inner: Arc::new(Inner {
                store: self.store,
                backend: self.backend,
                mode: self.mode,
                keys,
                expiry,
                classifier: self.classifier,
                reporter: self.reporter,
                tasks: Arc::new(BackgroundTasks::default()),
            }),
        }
    }
}

impl Memsource {
    pub fn builder(store: Arc<dyn CacheStore>, backend: Arc<dyn Backend>) -> MemsourceBuilder {
        MemsourceBuilder {
            store,
            backend,
            mode: Mode::default(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            expires: Expiry::default(),
            fresh_ttl: Expiry::default(),
            partitioner: None,
            classifier: Classifier::default(),
            reporter: Arc::new(TracingReporter),
        }
    }

    /// Builder pre-populated from a loaded [`Config`].
    pub fn from_config(
        config: &Config,
        store: Arc<dyn CacheStore>,
        backend: Arc<dyn Backend>,
    ) -> MemsourceBuilder {
        Self::builder(store, backend)
            .mode(config.mode)
            .expires(config.expires.clone())
            .fresh_ttl(config.fresh_ttl.clone())
            .key_prefix(config.key_prefix.clone())
    }

    pub fn mode(&self) -> Mode {
        self.inner.mode
    }

    /// Cache key used for `identifier`.
    pub fn key_for(&self, identifier: &str) -> String {
        self.inner.keys.key(identifier)
    }

    pub fn expiry(&self) -> &ExpiryResolver {
        &self.inner.expiry
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.inner.backend
    }

    /// Number of background writes/refreshes still running.
    pub fn pending_tasks(&self) -> usize {
        self.inner.tasks.pending()
    }

    /// Waits until every background write, reconciliation and refresh has finished.
    pub async fn settle(&self) {
        self.inner.tasks.settle().await;
    }

    /// Retrieves `identifier` using the configured strategy.
    #[instrument(skip(self), fields(mode = %self.inner.mode))]
    pub async fn get(&self, identifier: &str) -> FetchResult {
        let key = self.inner.keys.key(identifier);
        let expiry = self.inner.expiry.resolve(identifier);

        match self.inner.mode {
            Mode::ReadThrough => self.read_through(identifier, key, expiry.ttl).await,
            Mode::Race => self.race(identifier, key, expiry.ttl).await,
            Mode::Relay => self.relay(identifier, key, expiry).await,
        }
    }

    fn report(&self, error: CacheError) {
        self.inner.reporter.report(&error);
    }

    async fn fetch(&self, identifier: &str) -> FetchResult {
        self.inner.backend.fetch(identifier).await
    }

    pub(crate) async fn lookup(&self, key: &str) -> Lookup {
        match self.inner.store.get(key).await {
            Ok(Some(bytes)) => match CacheEntry::decode(&bytes) {
                Ok(entry) => Lookup::Hit(entry, bytes),
                Err(source) => {
                    self.report(CacheError::Corruption {
                        key: key.to_string(),
                        source,
                    });
                    Lookup::Corrupt(bytes)
                }
            },
            Ok(None) => Lookup::Miss,
            Err(source) => {
                self.report(CacheError::Transport {
                    key: key.to_string(),
                    source,
                });
                Lookup::Unavailable
            }
        }
    }

    async fn write(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        match self.inner.store.set(key, value, ttl).await {
            Ok(()) => debug!(key, ttl_secs = ttl.as_secs(), "Stored cache entry"),
            Err(source) => self.report(CacheError::Write {
                key: key.to_string(),
                source,
            }),
        }
    }

    async fn persist(&self, key: &str, ttl: Duration, entry: CacheEntry) {
        match entry.encode() {
            Ok(value) => self.write(key, value, ttl).await,
            Err(source) => self.report(CacheError::Encode {
                key: key.to_string(),
                source,
            }),
        }
    }

    /// Encodes and stores `entry` without blocking the caller.
    fn spawn_persist(&self, key: String, ttl: Duration, entry: CacheEntry) {
        let source = self.clone();
        self.inner.tasks.spawn(async move {
            source.persist(&key, ttl, entry).await;
        });
    }
}
