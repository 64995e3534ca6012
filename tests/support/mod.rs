//! Asset tree fixtures shared by the integration tests
//!
//! Builds a throwaway project directory:
//!
//! ```text
//! <tmp>/tilescape.toml
//! <tmp>/data/values.json
//! <tmp>/data/sprites/*.png
//! <tmp>/data/letters/<char>/<mode>_<width>.png
//! <tmp>/data/palette.png
//! <tmp>/data/plate.png
//! ```

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use tempfile::TempDir;
use tilescape::config::load_config_file;
use tilescape::Engine;

pub const RED: Rgba<u8> = Rgba([220, 40, 40, 255]);
pub const GREEN: Rgba<u8> = Rgba([40, 220, 40, 255]);
pub const BLUE: Rgba<u8> = Rgba([40, 40, 220, 255]);

pub struct AssetTree {
    pub dir: TempDir,
}

impl AssetTree {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("data/sprites")).unwrap();
        fs::write(dir.path().join("tilescape.toml"), "[render]\nframe_delay_ms = 600\n").unwrap();
        let tree = Self { dir };
        tree.catalog("{}");
        tree
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("tilescape.toml")
    }

    pub fn data(&self) -> PathBuf {
        self.root().join("data")
    }

    /// Replace the catalog file.
    pub fn catalog(&self, json: &str) {
        fs::write(self.data().join("values.json"), json).unwrap();
    }

    /// Write a solid square sprite file, e.g. `wall_1.png`.
    pub fn sprite(&self, file: &str, size: u32, color: Rgba<u8>) {
        write_png(&self.data().join("sprites").join(file), RgbaImage::from_pixel(size, size, color));
    }

    pub fn glyph(&self, c: char, mode: u8, width: u32, height: u32) {
        let path = self.data().join("letters").join(c.to_string()).join(format!("{}_{}.png", mode, width));
        write_png(&path, RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])));
    }

    pub fn palette(&self, image: RgbaImage) {
        write_png(&self.data().join("palette.png"), image);
    }

    pub fn plate(&self, image: RgbaImage) {
        write_png(&self.data().join("plate.png"), image);
    }

    pub fn engine(&self) -> Engine {
        let config = load_config_file(&self.config_path()).unwrap();
        Engine::from_config(config).unwrap()
    }
}

fn write_png(path: &Path, image: RgbaImage) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    image.save(path).unwrap();
}

/// Bounding box `(min_x, min_y, max_x, max_y)` of pixels equal to `color`.
pub fn bbox_of(image: &RgbaImage, color: Rgba<u8>) -> Option<(u32, u32, u32, u32)> {
    let mut bbox: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if *pixel == color {
            bbox = Some(match bbox {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }
    bbox
}

pub fn count_of(image: &RgbaImage, color: Rgba<u8>) -> usize {
    image.pixels().filter(|p| **p == color).count()
}
