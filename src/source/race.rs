use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::debug;

use super::{CacheError, Lookup, Memsource};
use crate::codec::CacheEntry;
use crate::resource::{FetchError, FetchResult};

/// Per-request delivery slot. The first `deliver` wins; later ones are dropped.
struct RaceState {
    tx: Mutex<Option<oneshot::Sender<FetchResult>>>,
}

impl RaceState {
    fn new(tx: oneshot::Sender<FetchResult>) -> Self {
        Self {
            tx: Mutex::new(Some(tx)),
        }
    }

    /// Returns `true` if this call delivered the answer.
    fn deliver(&self, result: FetchResult) -> bool {
        match self.tx.lock().take() {
            Some(tx) => tx.send(result).is_ok(),
            None => false,
        }
    }
}

impl Memsource {
    /// Cache lookup and backend fetch run concurrently. The caller gets whichever usable
    /// answer arrives first; the backend answer is written once both sides are done.
    pub(super) async fn race(&self, identifier: &str, key: String, ttl: Duration) -> FetchResult {
        let (tx, rx) = oneshot::channel();
        let source = self.clone();
        let identifier = identifier.to_string();

        self.inner.tasks.spawn(async move {
            let state = RaceState::new(tx);

            let cached = async {
                let lookup = source.lookup(&key).await;
                if let Lookup::Hit(entry, _) = &lookup
                    && state.deliver(entry.clone().into_result())
                {
                    debug!(key = %key, "Race won by cache");
                }
                lookup
            };
            let fetched = async {
                let result = source.fetch(&identifier).await;
                if state.deliver(result.clone()) {
                    debug!(key = %key, "Race won by backend");
                }
                result
            };

            let (lookup, result) = tokio::join!(cached, fetched);
            source.reconcile(&key, ttl, lookup, &result).await;
        });

        rx.await
            .unwrap_or_else(|_| Err(FetchError::new("race task ended without a result")))
    }

    /// Writes the backend answer unless the store is down, the answer is uncacheable, or the
    /// store already holds the same bytes.
    async fn reconcile(&self, key: &str, ttl: Duration, lookup: Lookup, result: &FetchResult) {
        let current = match lookup {
            Lookup::Unavailable => return,
            Lookup::Hit(_, bytes) | Lookup::Corrupt(bytes) => Some(bytes),
            Lookup::Miss => None,
        };

        let Some(entry) = CacheEntry::capture(result, &self.inner.classifier) else {
            return;
        };

        let encoded = match entry.encode() {
            Ok(encoded) => encoded,
            Err(source) => {
                self.report(CacheError::Encode {
                    key: key.to_string(),
                    source,
                });
                return;
            }
        };

        if current.as_deref() == Some(encoded.as_slice()) {
            debug!(key, "Cache already current");
            return;
        }
        self.write(key, encoded, ttl).await;
    }
}
