//! Maps backend outcomes to cacheability classes.

#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::Arc;

use crate::constants::{LEGACY_NOT_FOUND_MESSAGES, STATUS_FORBIDDEN, STATUS_NOT_FOUND};
use crate::resource::{FetchError, FetchResult};

/// Cacheability class of a backend outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheClass {
    Found,
    NotFound,
    Forbidden,
    /// Any other error. Always recomputed, never written to the cache.
    Uncacheable,
}

impl CacheClass {
    #[inline]
    pub fn is_cacheable(&self) -> bool {
        !matches!(self, CacheClass::Uncacheable)
    }
}

/// Extracts an HTTP-style status from a backend error.
pub type StatusExtractor = Arc<dyn Fn(&FetchError) -> Option<u16> + Send + Sync>;

/// Classifies [`FetchResult`]s using a pluggable status extractor.
#[derive(Clone)]
pub struct Classifier {
    status_of: StatusExtractor,
}

impl Classifier {
    /// Uses [`default_status`]: the reported status, else the legacy not-found messages.
    pub fn new() -> Self {
        Self {
            status_of: Arc::new(default_status),
        }
    }

    pub fn with_status_extractor<F>(extractor: F) -> Self
    where
        F: Fn(&FetchError) -> Option<u16> + Send + Sync + 'static,
    {
        Self {
            status_of: Arc::new(extractor),
        }
    }

    pub fn classify(&self, result: &FetchResult) -> CacheClass {
        match result {
            Ok(_) => CacheClass::Found,
            Err(err) => self.classify_error(err),
        }
    }

    pub fn classify_error(&self, err: &FetchError) -> CacheClass {
        match (self.status_of)(err) {
            Some(STATUS_NOT_FOUND) => CacheClass::NotFound,
            Some(STATUS_FORBIDDEN) => CacheClass::Forbidden,
            _ => CacheClass::Uncacheable,
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier").finish_non_exhaustive()
    }
}

/// Reported status first, then the legacy "Tile/Grid does not exist" messages.
pub fn default_status(err: &FetchError) -> Option<u16> {
    err.status.or_else(|| legacy_status(err))
}

/// Status implied by a legacy sentinel message, ignoring any reported status.
pub fn legacy_status(err: &FetchError) -> Option<u16> {
    LEGACY_NOT_FOUND_MESSAGES
        .contains(&err.message.as_str())
        .then_some(STATUS_NOT_FOUND)
}
