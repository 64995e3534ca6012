//! Data models for parsed scenes (variants, tiles, scenes, flags)

use image::Rgba;
use serde::Serialize;

/// Ground tile used when a scene does not set `--ground`.
pub const DEFAULT_GROUND: &str = "terrain_0";

/// Background used when a scene does not set `--bg`.
pub const DEFAULT_BACKGROUND: Rgba<u8> = Rgba([0x40, 0x44, 0x64, 0xFF]);

/// A named effect token with ordered string arguments, e.g. `displace/1/0/0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub name: String,
    pub arguments: Vec<String>,
}

impl Variant {
    pub fn new(name: impl Into<String>, arguments: Vec<String>) -> Self {
        Self { name: name.into(), arguments }
    }

    /// Parse `name/arg/arg` into a variant.
    ///
    /// ```
    /// use tilescape::models::Variant;
    ///
    /// let v = Variant::parse("displace/1/2/3");
    /// assert_eq!(v.name, "displace");
    /// assert_eq!(v.arguments, vec!["1", "2", "3"]);
    /// ```
    pub fn parse(s: &str) -> Self {
        let mut parts = s.split('/');
        let name = parts.next().unwrap_or_default().to_string();
        Self { name, arguments: parts.map(str::to_string).collect() }
    }
}

/// Interpretation and asset-location data for one tile name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileMetadata {
    /// Whether sprites are stored per orientation
    pub directional: bool,
    /// Vertical offset for raised ground, in quarter tiles
    pub ground_height: i32,
    /// Number of wobble frames on disk (1 means static)
    pub frame_count: u32,
    /// Whether the tile gets a dark unit outline
    pub unit: bool,
    /// Directory containing `sprites/`
    pub asset_directory: String,
}

impl TileMetadata {
    /// Metadata for synthetic `text_` tiles that are not in the catalog.
    pub fn text(asset_directory: impl Into<String>) -> Self {
        Self {
            directional: false,
            ground_height: 0,
            frame_count: 1,
            unit: false,
            asset_directory: asset_directory.into(),
        }
    }
}

/// One placed element of a scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Pixel layer within a depth step, used to break ties
    pub p: f64,
    /// 0 = down, 1 = right, 2 = up, 3 = left
    pub orientation: u8,
    /// Canonical variants left after the geometric pass
    pub variants: Vec<Variant>,
    /// Per-frame working copy consumed by the pixel pass
    #[serde(skip)]
    pub running_variants: Vec<Variant>,
    /// Private copy of the catalog entry
    pub metadata: TileMetadata,
}

impl Tile {
    pub fn new(
        name: impl Into<String>,
        position: (f64, f64, f64, f64),
        variants: Vec<Variant>,
        metadata: TileMetadata,
    ) -> Self {
        let (x, y, z, p) = position;
        Self {
            name: name.into(),
            x,
            y,
            z,
            p,
            orientation: 0,
            variants,
            running_variants: Vec::new(),
            metadata,
        }
    }

    /// Whether this tile is rendered from glyphs instead of a sprite file.
    pub fn is_text(&self) -> bool {
        self.name.starts_with("text_")
    }

    /// Reinitialize the working variant list from the canonical one.
    pub fn reset_running_variants(&mut self) {
        self.running_variants.clone_from(&self.variants);
    }
}

/// A parsed, bounded collection of tiles awaiting rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub min_depth: f64,
    pub max_depth: f64,
    pub pixel_depth: f64,
    pub tiles: Vec<Tile>,
}

/// Global render options carried in the scene text.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagSet {
    pub background: Rgba<u8>,
    pub default_ground: String,
    /// Whether `default_ground` came from an explicit `--ground` flag
    pub ground_is_explicit: bool,
}

impl Default for FlagSet {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND,
            default_ground: DEFAULT_GROUND.to_string(),
            ground_is_explicit: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_without_arguments() {
        let v = Variant::parse("unit");
        assert_eq!(v.name, "unit");
        assert!(v.arguments.is_empty());
    }

    #[test]
    fn test_variant_keeps_empty_arguments() {
        let v = Variant::parse("m/");
        assert_eq!(v.arguments, vec![""]);
    }

    #[test]
    fn test_reset_running_variants() {
        let mut tile = Tile::new(
            "baba",
            (0.0, 0.0, 0.0, 0.0),
            vec![Variant::parse("gs")],
            TileMetadata::text("data"),
        );
        tile.reset_running_variants();
        tile.running_variants.clear();
        tile.reset_running_variants();
        assert_eq!(tile.running_variants, tile.variants);
    }

    #[test]
    fn test_text_tile_detection() {
        let tile = Tile::new("text_baba", (0.0, 0.0, 0.0, 0.0), vec![], TileMetadata::text("d"));
        assert!(tile.is_text());
    }
}
