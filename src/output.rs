//! PNG frame output and upscaling

use image::imageops::FilterType;
use image::RgbaImage;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save(path)?;
    Ok(())
}

/// Write each frame as `<dir>/<stem>_<n>.png`, numbered from 1.
pub fn save_frames(frames: &[RgbaImage], dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(frames.len());
    for (i, frame) in frames.iter().enumerate() {
        let path = dir.join(format!("{}_{}.png", stem, i + 1));
        save_png(frame, &path)?;
        paths.push(path);
    }
    Ok(paths)
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// This keeps pixel edges crisp. A factor of 0 or 1 returns the image as is.
pub fn scale_image(image: RgbaImage, factor: u8) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    let new_w = w * factor as u32;
    let new_h = h * factor as u32;
    image::imageops::resize(&image, new_w, new_h, FilterType::Nearest)
}
