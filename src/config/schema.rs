//! Configuration schema types for `tilescape.toml`
//!
//! Every field has a default, so an empty file (or no file at all) is a
//! valid configuration. Asset paths are relative to `assets.root`, which is
//! itself relative to the directory holding the config file.

use image::Rgba;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::color::parse_color;
use crate::composition::MAX_FRAME_SIDE;
use crate::models::{FlagSet, DEFAULT_GROUND};

/// Asset locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Default asset directory for catalog entries without `source`
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Sprite subdirectory inside each asset directory
    #[serde(default = "default_sprites")]
    pub sprites: String,
    /// Glyph directory, relative to `root`
    #[serde(default = "default_letters")]
    pub letters: PathBuf,
    /// Palette image, relative to `root`
    #[serde(default = "default_palette")]
    pub palette: PathBuf,
    /// Property plate sprite, relative to `root`
    #[serde(default = "default_plate")]
    pub plate: PathBuf,
    /// Tile catalog JSON, relative to `root`
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,
}

fn default_root() -> PathBuf {
    PathBuf::from("data")
}

fn default_sprites() -> String {
    "sprites".to_string()
}

fn default_letters() -> PathBuf {
    PathBuf::from("letters")
}

fn default_palette() -> PathBuf {
    PathBuf::from("palette.png")
}

fn default_plate() -> PathBuf {
    PathBuf::from("plate.png")
}

fn default_catalog() -> PathBuf {
    PathBuf::from("values.json")
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            sprites: default_sprites(),
            letters: default_letters(),
            palette: default_palette(),
            plate: default_plate(),
            catalog: default_catalog(),
        }
    }
}

/// Rendering defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Delay between animation frames
    #[serde(default = "default_frame_delay_ms")]
    pub frame_delay_ms: u32,
    /// Nearest-neighbor upscale factor for finished frames
    #[serde(default = "default_scale")]
    pub scale: u8,
    /// Largest side of a finished frame, in output pixels
    #[serde(default = "default_max_frame_size")]
    pub max_frame_size: u32,
    /// Background color used when a scene has no `--bg` flag
    #[serde(default = "default_background")]
    pub background: String,
    /// Ground tile used when a scene has no `--ground` flag
    #[serde(default = "default_ground")]
    pub ground: String,
}

fn default_frame_delay_ms() -> u32 {
    600
}

fn default_scale() -> u8 {
    2
}

fn default_max_frame_size() -> u32 {
    4096
}

fn default_background() -> String {
    "#404464".to_string()
}

fn default_ground() -> String {
    DEFAULT_GROUND.to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            frame_delay_ms: default_frame_delay_ms(),
            scale: default_scale(),
            max_frame_size: default_max_frame_size(),
            background: default_background(),
            ground: default_ground(),
        }
    }
}

/// Complete `tilescape.toml` configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilescapeConfig {
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub render: RenderConfig,
    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "render.scale")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tilescape.toml: '{}' {}", self.field, self.message)
    }
}

/// Absolute asset locations after resolving a config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub root: PathBuf,
    pub sprites: String,
    pub letters: PathBuf,
    pub palette: PathBuf,
    pub plate: PathBuf,
    pub catalog: PathBuf,
}

impl TilescapeConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.render.scale == 0 {
            errors.push(ConfigValidationError {
                field: "render.scale".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        if self.render.max_frame_size == 0 || self.render.max_frame_size > MAX_FRAME_SIDE {
            errors.push(ConfigValidationError {
                field: "render.max_frame_size".to_string(),
                message: format!("must be between 1 and {}", MAX_FRAME_SIDE),
            });
        }

        if let Err(e) = parse_color(&self.render.background) {
            errors.push(ConfigValidationError {
                field: "render.background".to_string(),
                message: format!("is not a color: {}", e),
            });
        }

        if self.render.ground.trim().is_empty() {
            errors.push(ConfigValidationError {
                field: "render.ground".to_string(),
                message: "must name a tile".to_string(),
            });
        }

        if self.assets.sprites.is_empty() {
            errors.push(ConfigValidationError {
                field: "assets.sprites".to_string(),
                message: "must be a non-empty directory name".to_string(),
            });
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Resolve asset paths against the config directory.
    pub fn asset_paths(&self) -> AssetPaths {
        let root = resolve(&self.base_dir, &self.assets.root);
        AssetPaths {
            sprites: self.assets.sprites.clone(),
            letters: resolve(&root, &self.assets.letters),
            palette: resolve(&root, &self.assets.palette),
            plate: resolve(&root, &self.assets.plate),
            catalog: resolve(&root, &self.assets.catalog),
            root,
        }
    }

    /// Background color; validation guarantees it parses.
    pub fn background(&self) -> Rgba<u8> {
        parse_color(&self.render.background).unwrap_or(crate::models::DEFAULT_BACKGROUND)
    }

    /// Flag values a scene starts from before its own flags apply.
    pub fn default_flags(&self) -> FlagSet {
        FlagSet {
            background: self.background(),
            default_ground: crate::parser::cell_name(&self.render.ground),
            ground_is_explicit: false,
        }
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
