//! Memsource library crate (used by the demo binary and integration tests).
//!
//! A cache-augmented retrieval layer: [`Memsource`] sits between callers and a slow
//! [`Backend`], serving repeat requests from a [`CacheStore`] while preserving the backend's
//! success/error semantics, headers and payload bytes.
//!
//! # Public API Surface
//!
//! ## Engine
//! - [`Memsource`], [`MemsourceBuilder`], [`Mode`] - Read-through, race and relay strategies
//! - [`ErrorReporter`], [`TracingReporter`], [`CacheError`] - Non-fatal cache error reporting
//! - [`TileSource`], [`TileBackend`] - Tile/grid facade with legacy not-found messages
//!
//! ## Building Blocks
//! - [`Classifier`], [`CacheClass`] - Outcome classification
//! - [`CacheEntry`], [`CodecError`] - Cache value codec
//! - [`Expiry`], [`ExpiryResolver`] - Uniform or per-host TTLs
//! - [`MemoryStore`], [`TimeoutStore`] - Store implementations
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod backend;
pub mod classify;
pub mod clock;
pub mod codec;
pub mod config;
pub mod constants;
pub mod expiry;
pub mod hashing;
pub mod resource;
pub mod source;
pub mod store;
pub mod tiles;

pub use backend::{Backend, DirectoryBackend, FnBackend};
#[cfg(any(test, feature = "mock"))]
pub use backend::MockBackend;
pub use classify::{CacheClass, Classifier};
pub use codec::{CacheEntry, CodecError, CodecResult};
pub use config::{Config, ConfigError};
pub use expiry::{Expiry, ExpiryResolver, ResolvedExpiry};
pub use hashing::{KeyBuilder, fingerprint};
pub use resource::{FetchError, FetchResult, Headers, Payload, Resource};
#[cfg(any(test, feature = "mock"))]
pub use source::CollectingReporter;
pub use source::{CacheError, ErrorReporter, Memsource, MemsourceBuilder, Mode, TracingReporter};
#[cfg(any(test, feature = "mock"))]
pub use store::{FailingStore, RecordingStore, StoreCall};
pub use store::{CacheStore, MemoryStore, StoreError, StoreResult, TimeoutStore};
pub use tiles::{TileBackend, TileCoord, TileFormat, TileSource};
