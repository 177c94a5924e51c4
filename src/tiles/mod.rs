//! Tile and grid retrieval on top of [`Memsource`].
//!
//! A [`TileBackend`] produces tiles and UTF-grids by coordinate. [`TileSource`] adapts it to
//! the identifier-based engine (`tile/{z}/{x}/{y}`, `grid/{z}/{x}/{y}`) and restores the
//! not-found messages tile consumers match on.


use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::backend::Backend;
use crate::config::Config;
use crate::constants::{GRID_NOT_FOUND_MESSAGE, STATUS_NOT_FOUND, TILE_NOT_FOUND_MESSAGE};
use crate::resource::{FetchError, FetchResult};
use crate::source::{Memsource, MemsourceBuilder};
use crate::store::CacheStore;

/// Kind of resource addressed by a tile identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileFormat {
    Tile,
    Grid,
}

impl TileFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TileFormat::Tile => "tile",
            TileFormat::Grid => "grid",
        }
    }

    pub fn not_found_message(&self) -> &'static str {
        match self {
            TileFormat::Tile => TILE_NOT_FOUND_MESSAGE,
            TileFormat::Grid => GRID_NOT_FOUND_MESSAGE,
        }
    }
}

/// `z/x/y` tile address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Engine identifier for this coordinate, e.g. `tile/3/1/2`.
    pub fn identifier(&self, format: TileFormat) -> String {
        format!("{}/{}", format.as_str(), self)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// A malformed tile identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid tile identifier '{0}': expected tile|grid/z/x/y")]
pub struct TileIdError(pub String);

/// Parses `tile/z/x/y` or `grid/z/x/y`.
pub fn parse_identifier(identifier: &str) -> Result<(TileFormat, TileCoord), TileIdError> {
    let invalid = || TileIdError(identifier.to_string());
    let mut parts = identifier.split('/');

    let format = match parts.next() {
        Some("tile") => TileFormat::Tile,
        Some("grid") => TileFormat::Grid,
        _ => return Err(invalid()),
    };
    let (Some(z), Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };
    let coord = TileCoord {
        z: z.parse().map_err(|_| invalid())?,
        x: x.parse().map_err(|_| invalid())?,
        y: y.parse().map_err(|_| invalid())?,
    };
    Ok((format, coord))
}

impl FromStr for TileCoord {
    type Err = TileIdError;

    /// Parses a bare `z/x/y`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_identifier(&format!("tile/{s}")).map(|(_, coord)| coord)
    }
}

/// Producer of tiles, grids and tileset metadata.
#[async_trait]
pub trait TileBackend: Send + Sync {
    async fn get_tile(&self, coord: TileCoord) -> FetchResult;

    /// Grids are JSON payloads.
    async fn get_grid(&self, coord: TileCoord) -> FetchResult;

    /// Tileset metadata. Never cached.
    async fn get_info(&self) -> Result<Value, FetchError>;

    fn descriptor(&self) -> Value;
}

/// Exposes a [`TileBackend`] through the identifier-based [`Backend`] seam.
struct TileAdapter {
    tiles: Arc<dyn TileBackend>,
}

#[async_trait]
impl Backend for TileAdapter {
    async fn fetch(&self, identifier: &str) -> FetchResult {
        let (format, coord) = parse_identifier(identifier)
            .map_err(|err| FetchError::with_status(400, err.to_string()))?;
        match format {
            TileFormat::Tile => self.tiles.get_tile(coord).await,
            TileFormat::Grid => self.tiles.get_grid(coord).await,
        }
    }

    fn descriptor(&self) -> Value {
        self.tiles.descriptor()
    }
}

/// Cached tile source.
#[derive(Clone)]
pub struct TileSource {
    tiles: Arc<dyn TileBackend>,
    source: Memsource,
}

impl fmt::Debug for TileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileSource")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl TileSource {
    pub fn new(store: Arc<dyn CacheStore>, tiles: Arc<dyn TileBackend>) -> Self {
        Self::configure(store, tiles, |builder| builder)
    }

    /// Builds the underlying engine, letting `configure` set mode, expiry and the rest.
    pub fn configure<F>(store: Arc<dyn CacheStore>, tiles: Arc<dyn TileBackend>, configure: F) -> Self
    where
        F: FnOnce(MemsourceBuilder) -> MemsourceBuilder,
    {
        let backend = Arc::new(TileAdapter {
            tiles: tiles.clone(),
        });
        let source = configure(Memsource::builder(store, backend)).build();
        Self { tiles, source }
    }

    pub fn from_config(
        config: &Config,
        store: Arc<dyn CacheStore>,
        tiles: Arc<dyn TileBackend>,
    ) -> Self {
        let backend = Arc::new(TileAdapter {
            tiles: tiles.clone(),
        });
        let source = Memsource::from_config(config, store, backend).build();
        Self { tiles, source }
    }

    pub fn source(&self) -> &Memsource {
        &self.source
    }

    pub async fn get_tile(&self, z: u8, x: u32, y: u32) -> FetchResult {
        self.get(TileFormat::Tile, TileCoord::new(z, x, y)).await
    }

    pub async fn get_grid(&self, z: u8, x: u32, y: u32) -> FetchResult {
        self.get(TileFormat::Grid, TileCoord::new(z, x, y)).await
    }

    pub async fn get_info(&self) -> Result<Value, FetchError> {
        self.tiles.get_info().await
    }

    pub async fn settle(&self) {
        self.source.settle().await;
    }

    async fn get(&self, format: TileFormat, coord: TileCoord) -> FetchResult {
        self.source
            .get(&coord.identifier(format))
            .await
            .map_err(|err| legacy_error(format, err))
    }
}

/// Not-found errors carry the per-format message regardless of where they came from.
fn legacy_error(format: TileFormat, mut err: FetchError) -> FetchError {
    if err.status == Some(STATUS_NOT_FOUND) {
        err.message = format.not_found_message().to_string();
    }
    err
}
