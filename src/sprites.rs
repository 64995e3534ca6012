//! Sprite loading and caching
//!
//! Sprites live under each tile's asset directory:
//!
//! ```text
//! <asset_directory>/sprites/<name>[_<orientation>]_<frame>.png
//! ```
//!
//! Frames are numbered from 1 on disk. The orientation segment is only
//! present for directional tiles. `text_` tiles have no files of their own
//! and are drawn by the [`GlyphLayoutEngine`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use image::RgbaImage;

use crate::error::{RenderError, Result, UserError};
use crate::glyphs::GlyphLayoutEngine;
use crate::models::Tile;
use crate::variants::VariantAssets;

/// Names that stand for "no tile here".
const PLACEHOLDER_NAMES: [&str; 3] = ["", "-", "."];

/// Anything that can hand out tile bitmaps to the compositor.
pub trait SpriteSource: VariantAssets + Send + Sync {
    /// Bitmap for a tile at the given wobble frame, or `None` for placeholders.
    fn get_sprite(&self, tile: &Tile, wobble: u8) -> Result<Option<Arc<RgbaImage>>>;
}

/// Cache key after frame and orientation normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpriteKey {
    pub name: String,
    pub frame: u8,
    pub orientation: u8,
}

impl SpriteKey {
    /// Normalize a tile and wobble frame into a cache key.
    ///
    /// Static tiles always use frame 0 and non-directional tiles always use
    /// orientation 0, so they share one cache entry.
    pub fn for_tile(tile: &Tile, wobble: u8) -> Self {
        let frame = if tile.metadata.frame_count <= 1 {
            0
        } else {
            (wobble as u32 % tile.metadata.frame_count) as u8
        };
        let orientation = if tile.metadata.directional { tile.orientation } else { 0 };
        Self { name: tile.name.clone(), frame, orientation }
    }
}

/// On-disk location of a sprite frame.
///
/// ```
/// use std::path::Path;
/// use tilescape::sprites::sprite_path;
///
/// let p = sprite_path(Path::new("data"), "sprites", "baba", Some(1), 0);
/// assert_eq!(p, Path::new("data/sprites/baba_1_1.png"));
///
/// let p = sprite_path(Path::new("data"), "sprites", "wall", None, 2);
/// assert_eq!(p, Path::new("data/sprites/wall_3.png"));
/// ```
pub fn sprite_path(
    asset_directory: &Path,
    sprites_dir: &str,
    name: &str,
    orientation: Option<u8>,
    frame: u8,
) -> PathBuf {
    let file = match orientation {
        Some(o) => format!("{}_{}_{}.png", name, o, frame as u32 + 1),
        None => format!("{}_{}.png", name, frame as u32 + 1),
    };
    asset_directory.join(sprites_dir).join(file)
}

/// Filesystem-backed sprite cache shared across renders.
#[derive(Debug)]
pub struct SpriteStore {
    sprites_dir: String,
    palette_path: PathBuf,
    plate_path: PathBuf,
    glyphs: GlyphLayoutEngine,
    cache: Mutex<HashMap<SpriteKey, Arc<RgbaImage>>>,
    palette: Mutex<Option<Arc<RgbaImage>>>,
    plate: Mutex<Option<Arc<RgbaImage>>>,
}

impl SpriteStore {
    pub fn new(
        sprites_dir: impl Into<String>,
        palette_path: impl Into<PathBuf>,
        plate_path: impl Into<PathBuf>,
        glyphs: GlyphLayoutEngine,
    ) -> Self {
        Self {
            sprites_dir: sprites_dir.into(),
            palette_path: palette_path.into(),
            plate_path: plate_path.into(),
            glyphs,
            cache: Mutex::new(HashMap::new()),
            palette: Mutex::new(None),
            plate: Mutex::new(None),
        }
    }

    /// Number of cached bitmaps.
    pub fn cached(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn load_sprite(&self, tile: &Tile, key: &SpriteKey) -> Result<RgbaImage> {
        if let Some(word) = tile.name.strip_prefix("text_") {
            return self.glyphs.render_text(word);
        }
        let orientation = tile.metadata.directional.then_some(key.orientation);
        let path = sprite_path(
            Path::new(&tile.metadata.asset_directory),
            &self.sprites_dir,
            &key.name,
            orientation,
            key.frame,
        );
        load_png(&tile.name, &path)
    }
}

impl SpriteSource for SpriteStore {
    fn get_sprite(&self, tile: &Tile, wobble: u8) -> Result<Option<Arc<RgbaImage>>> {
        if PLACEHOLDER_NAMES.contains(&tile.name.as_str()) {
            return Ok(None);
        }
        let key = SpriteKey::for_tile(tile, wobble);

        // Held across the load so an entry is filled once, and only when complete
        let mut cache = self.cache.lock().map_err(|_| RenderError::CachePoisoned)?;
        if let Some(sprite) = cache.get(&key) {
            return Ok(Some(Arc::clone(sprite)));
        }
        let sprite = Arc::new(self.load_sprite(tile, &key)?);
        tracing::debug!(name = %key.name, frame = key.frame, orientation = key.orientation, "cached sprite");
        cache.insert(key, Arc::clone(&sprite));
        Ok(Some(sprite))
    }
}

impl VariantAssets for SpriteStore {
    fn palette(&self) -> Result<Arc<RgbaImage>> {
        load_once(&self.palette, "palette", &self.palette_path)
    }

    fn plate(&self) -> Result<Arc<RgbaImage>> {
        load_once(&self.plate, "property plate", &self.plate_path)
    }
}

fn load_once(slot: &Mutex<Option<Arc<RgbaImage>>>, what: &str, path: &Path) -> Result<Arc<RgbaImage>> {
    let mut slot = slot.lock().map_err(|_| RenderError::CachePoisoned)?;
    if let Some(image) = slot.as_ref() {
        return Ok(Arc::clone(image));
    }
    let image = Arc::new(load_png(what, path)?);
    *slot = Some(Arc::clone(&image));
    Ok(image)
}

fn load_png(tile: &str, path: &Path) -> Result<RgbaImage> {
    if !path.is_file() {
        return Err(UserError::AssetMissing {
            tile: tile.to_string(),
            path: path.display().to_string(),
        }
        .into());
    }
    Ok(image::open(path)?.to_rgba8())
}
