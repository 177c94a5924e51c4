use parking_lot::Mutex;

use super::{CacheError, ErrorReporter};

/// Keeps every reported error as `(kind, message)` for assertions.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    errors: Mutex<Vec<(&'static str, String)>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Vec<(&'static str, String)> {
        self.errors.lock().clone()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.errors.lock().iter().filter(|(k, _)| *k == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.lock().is_empty()
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(&self, error: &CacheError) {
        self.errors.lock().push((error.kind(), error.to_string()));
    }
}
