//! Tile catalog: read-only name → metadata lookup
//!
//! The renderer only ever sees the [`TileCatalog`] trait. Two implementations
//! are provided: [`MemoryCatalog`] for embedding and tests, and
//! [`JsonCatalog`] which reads a `values.json` style file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::models::TileMetadata;

/// Read-only registry mapping tile names to metadata.
///
/// Implementations must be shareable across threads; lookups hand out owned
/// copies so callers can never mutate catalog state.
pub trait TileCatalog: Send + Sync {
    /// Look up a tile by name.
    fn lookup(&self, name: &str) -> Option<TileMetadata>;

    /// Check whether a tile exists.
    fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Number of tiles in the catalog.
    fn len(&self) -> usize;

    /// Check if the catalog is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Error loading a catalog file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// In-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    tiles: HashMap<String, TileMetadata>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self { tiles: HashMap::new() }
    }

    /// Register (or replace) a tile.
    pub fn insert(&mut self, name: impl Into<String>, metadata: TileMetadata) {
        self.tiles.insert(name.into(), metadata);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, metadata: TileMetadata) -> Self {
        self.insert(name, metadata);
        self
    }
}

impl TileCatalog for MemoryCatalog {
    fn lookup(&self, name: &str) -> Option<TileMetadata> {
        self.tiles.get(name).cloned()
    }

    fn len(&self) -> usize {
        self.tiles.len()
    }
}

/// One entry of a catalog file.
#[derive(Debug, Clone, Deserialize)]
struct CatalogEntry {
    #[serde(default)]
    dir: bool,
    #[serde(default)]
    ground: i32,
    #[serde(default = "default_frames")]
    frames: u32,
    #[serde(default)]
    unit: bool,
    /// Asset directory override
    #[serde(default)]
    source: Option<String>,
}

fn default_frames() -> u32 {
    1
}

/// Catalog loaded from a JSON object of `name -> {dir, ground, frames, unit, source}`.
#[derive(Debug, Clone, Default)]
pub struct JsonCatalog {
    inner: MemoryCatalog,
}

impl JsonCatalog {
    /// Load a catalog file. Entries without `source` use `asset_root`.
    pub fn load(path: &Path, asset_root: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)
            .map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;
        Self::from_json(&content, asset_root)
            .map_err(|source| CatalogError::Parse { path: path.to_path_buf(), source })
    }

    /// Parse catalog JSON from a string.
    pub fn from_json(content: &str, asset_root: &Path) -> Result<Self, serde_json::Error> {
        let entries: HashMap<String, CatalogEntry> = serde_json::from_str(content)?;
        let default_dir = asset_root.display().to_string();
        let mut inner = MemoryCatalog::new();
        for (name, entry) in entries {
            inner.insert(
                name,
                TileMetadata {
                    directional: entry.dir,
                    ground_height: entry.ground,
                    frame_count: entry.frames.max(1),
                    unit: entry.unit,
                    asset_directory: entry.source.unwrap_or_else(|| default_dir.clone()),
                },
            );
        }
        tracing::debug!(tiles = inner.len(), "loaded tile catalog");
        Ok(Self { inner })
    }
}

impl TileCatalog for JsonCatalog {
    fn lookup(&self, name: &str) -> Option<TileMetadata> {
        self.inner.lookup(name)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}
