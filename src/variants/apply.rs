//! Effect application for tiles and bitmaps

use std::collections::HashMap;

use image::{Rgba, RgbaImage};

use crate::color::multiply;
use crate::composition::blit_sprite;
use crate::error::{Result, UserError};
use crate::kernel::{alpha_channel, convolve_plus_n, pad};
use crate::models::Tile;

use super::types::{ColorSpec, GeometricEffect, PixelEffect, INACTIVE_COLOR, OUTLINE_COLOR};
use super::VariantAssets;

/// Apply a geometric effect to a tile in place.
pub fn apply_geometric(tile: &mut Tile, effect: &GeometricEffect) {
    match *effect {
        GeometricEffect::Displace { dx, dy, dz } => {
            tile.x += dx;
            tile.y += dy;
            tile.z += dz;
        }
        GeometricEffect::Unit => tile.metadata.unit = !tile.metadata.unit,
        GeometricEffect::Face(code) => tile.orientation = code,
    }
}

/// Apply a pixel effect, producing a new bitmap.
pub fn apply_pixel<A: VariantAssets + ?Sized>(
    image: RgbaImage,
    effect: &PixelEffect,
    assets: &A,
) -> Result<RgbaImage> {
    match effect {
        PixelEffect::Meta { level } => Ok(apply_meta(&image, *level)),
        PixelEffect::Clean => Ok(apply_clean(image)),
        PixelEffect::Color(spec) => {
            let color = resolve_color_spec(*spec, assets)?;
            let mut image = image;
            multiply(&mut image, color);
            Ok(image)
        }
        PixelEffect::Inactive => {
            let mut image = image;
            multiply(&mut image, INACTIVE_COLOR);
            Ok(image)
        }
        PixelEffect::Property => {
            let plate = assets.plate()?;
            Ok(apply_property(&image, &plate))
        }
        PixelEffect::Noun => Ok(apply_noun(image)),
        PixelEffect::Grayscale => Ok(apply_grayscale(image)),
    }
}

/// Count opaque colors, most frequent first, ties in first-seen order.
///
/// Pixels are visited row by row; any pixel with non-zero alpha counts.
pub fn opaque_histogram(image: &RgbaImage) -> Vec<(Rgba<u8>, usize)> {
    let mut index: HashMap<[u8; 4], usize> = HashMap::new();
    let mut counts: Vec<(Rgba<u8>, usize)> = Vec::new();
    for pixel in image.pixels().filter(|p| p[3] != 0) {
        match index.get(&pixel.0) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(pixel.0, counts.len());
                counts.push((*pixel, 1));
            }
        }
    }
    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Outline the sprite with its dominant color.
///
/// The output is padded by `level` pixels on every side. Odd levels leave
/// only the outline; even levels put the original pixels back inside it.
pub fn apply_meta(image: &RgbaImage, level: u32) -> RgbaImage {
    let dominant =
        opaque_histogram(image).first().map(|(c, _)| *c).unwrap_or(Rgba([0, 0, 0, 0]));
    let padded = pad(image, level);
    let edges = convolve_plus_n(&alpha_channel(&padded), level);
    let restore = level % 2 == 0;

    RgbaImage::from_fn(padded.width(), padded.height(), |x, y| {
        let original = *padded.get_pixel(x, y);
        if original[3] > 0 {
            return if restore { original } else { Rgba([0, 0, 0, 0]) };
        }
        let strength = edges.get_pixel(x, y)[0] as u16;
        let mut out = [0u8; 4];
        for c in 0..4 {
            out[c] = (dominant[c] as u16 * strength / 255) as u8;
        }
        Rgba(out)
    })
}

/// Stretch each channel so its brightest opaque value becomes 255.
pub fn apply_clean(mut image: RgbaImage) -> RgbaImage {
    let mut max = [0u8; 4];
    for pixel in image.pixels().filter(|p| p[3] != 0) {
        for c in 0..4 {
            max[c] = max[c].max(pixel[c]);
        }
    }
    for pixel in image.pixels_mut().filter(|p| p[3] != 0) {
        for c in 0..4 {
            if max[c] > 0 {
                pixel[c] = (pixel[c] as u32 * 255 / max[c] as u32) as u8;
            }
        }
    }
    image
}

/// Recolor opaque pixels near-black and center them on the plate.
pub fn apply_property(image: &RgbaImage, plate: &RgbaImage) -> RgbaImage {
    let mut text = image.clone();
    for pixel in text.pixels_mut().filter(|p| p[3] != 0) {
        pixel[0] = OUTLINE_COLOR[0];
        pixel[1] = OUTLINE_COLOR[1];
        pixel[2] = OUTLINE_COLOR[2];
    }

    let width = image.width().max(plate.width());
    let height = image.height().max(plate.height());
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    let centered = |img: &RgbaImage| {
        (((width - img.width()) / 2) as i64, ((height - img.height()) / 2) as i64)
    };
    let (px, py) = centered(plate);
    blit_sprite(&mut canvas, plate, px, py);
    let (tx, ty) = centered(&text);
    blit_sprite(&mut canvas, &text, tx, ty);
    canvas
}

/// Binarize against the darkest opaque color.
///
/// Pixels exactly equal to that color become opaque black, every other
/// opaque pixel opaque white.
pub fn apply_noun(mut image: RgbaImage) -> RgbaImage {
    let darkest = opaque_histogram(&image)
        .into_iter()
        .map(|(c, _)| c)
        .min_by_key(|c| c[0] as u32 + c[1] as u32 + c[2] as u32);
    let Some(darkest) = darkest else {
        return image;
    };

    for pixel in image.pixels_mut().filter(|p| p[3] != 0) {
        *pixel = if *pixel == darkest { Rgba([0, 0, 0, 255]) } else { Rgba([255, 255, 255, 255]) };
    }
    image
}

/// Replace RGB with its average; alpha untouched.
pub fn apply_grayscale(mut image: RgbaImage) -> RgbaImage {
    for pixel in image.pixels_mut() {
        let avg = ((pixel[0] as u16 + pixel[1] as u16 + pixel[2] as u16) / 3) as u8;
        pixel[0] = avg;
        pixel[1] = avg;
        pixel[2] = avg;
    }
    image
}

fn resolve_color_spec<A: VariantAssets + ?Sized>(spec: ColorSpec, assets: &A) -> Result<Rgba<u8>> {
    match spec {
        ColorSpec::Rgba(color) => Ok(color),
        ColorSpec::Palette(x, y) => {
            let palette = assets.palette()?;
            if x >= palette.width() || y >= palette.height() {
                return Err(UserError::argument(format!(
                    "The palette has no color at {},{}.",
                    x, y
                ))
                .into());
            }
            Ok(*palette.get_pixel(x, y))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TileMetadata;
    use std::sync::Arc;

    struct FixedAssets {
        palette: Arc<RgbaImage>,
        plate: Arc<RgbaImage>,
    }

    impl VariantAssets for FixedAssets {
        fn palette(&self) -> Result<Arc<RgbaImage>> {
            Ok(self.palette.clone())
        }
        fn plate(&self) -> Result<Arc<RgbaImage>> {
            Ok(self.plate.clone())
        }
    }

    fn assets() -> FixedAssets {
        let mut palette = RgbaImage::from_pixel(7, 5, Rgba([0, 0, 0, 255]));
        palette.put_pixel(3, 3, Rgba([228, 83, 59, 255]));
        FixedAssets {
            palette: Arc::new(palette),
            plate: Arc::new(RgbaImage::from_pixel(4, 4, Rgba([200, 100, 50, 255]))),
        }
    }

    fn opaque_square(size: u32, color: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_pixel(size, size, color)
    }

    #[test]
    fn test_displace_is_additive() {
        let mut tile = Tile::new("a", (1.0, 1.0, 0.0, 0.0), vec![], TileMetadata::text("d"));
        apply_geometric(&mut tile, &GeometricEffect::Displace { dx: 1.0, dy: 2.0, dz: 3.0 });
        assert_eq!((tile.x, tile.y, tile.z), (2.0, 3.0, 3.0));
        apply_geometric(&mut tile, &GeometricEffect::Displace { dx: 0.0, dy: 0.0, dz: 0.0 });
        assert_eq!((tile.x, tile.y, tile.z), (2.0, 3.0, 3.0));
    }

    #[test]
    fn test_unit_toggles() {
        let mut tile = Tile::new("a", (0.0, 0.0, 0.0, 0.0), vec![], TileMetadata::text("d"));
        apply_geometric(&mut tile, &GeometricEffect::Unit);
        assert!(tile.metadata.unit);
        apply_geometric(&mut tile, &GeometricEffect::Unit);
        assert!(!tile.metadata.unit);
    }

    #[test]
    fn test_histogram_order() {
        let mut img = RgbaImage::from_pixel(3, 1, Rgba([0, 0, 0, 0]));
        img.put_pixel(0, 0, Rgba([1, 1, 1, 255]));
        img.put_pixel(1, 0, Rgba([2, 2, 2, 255]));
        let hist = opaque_histogram(&img);
        // Tie broken by first-seen order, transparent pixel ignored
        assert_eq!(hist, vec![(Rgba([1, 1, 1, 255]), 1), (Rgba([2, 2, 2, 255]), 1)]);

        img.put_pixel(2, 0, Rgba([2, 2, 2, 255]));
        assert_eq!(opaque_histogram(&img)[0].0, Rgba([2, 2, 2, 255]));
    }

    #[test]
    fn test_meta_odd_level_is_pure_border() {
        let color = Rgba([50, 100, 150, 255]);
        let out = apply_meta(&opaque_square(4, color), 1);
        assert_eq!(out.dimensions(), (6, 6));

        // Interior removed
        for y in 1..5 {
            for x in 1..5 {
                assert_eq!(out.get_pixel(x, y)[3], 0, "interior pixel ({}, {})", x, y);
            }
        }
        // Edge-adjacent ring gets the dominant color
        assert_eq!(*out.get_pixel(0, 2), color);
        assert_eq!(*out.get_pixel(3, 5), color);
    }

    #[test]
    fn test_meta_even_level_restores_interior() {
        let color = Rgba([50, 100, 150, 255]);
        let out = apply_meta(&opaque_square(4, color), 2);
        assert_eq!(out.dimensions(), (8, 8));
        for y in 2..6 {
            for x in 2..6 {
                assert_eq!(*out.get_pixel(x, y), color);
            }
        }
    }

    #[test]
    fn test_meta_on_empty_image() {
        let out = apply_meta(&RgbaImage::new(2, 2), 1);
        assert!(out.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_clean_stretches_channels() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 0]));
        img.put_pixel(0, 0, Rgba([100, 50, 0, 255]));
        img.put_pixel(1, 0, Rgba([50, 25, 0, 255]));
        let out = apply_clean(img);
        assert_eq!(*out.get_pixel(0, 0), Rgba([255, 255, 0, 255]));
        assert_eq!(*out.get_pixel(1, 0), Rgba([127, 127, 0, 255]));
    }

    #[test]
    fn test_noun_binarizes() {
        let mut img = RgbaImage::from_pixel(3, 1, Rgba([0, 0, 0, 0]));
        img.put_pixel(0, 0, Rgba([10, 10, 10, 255]));
        img.put_pixel(1, 0, Rgba([200, 50, 50, 255]));
        let out = apply_noun(img);
        assert_eq!(*out.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*out.get_pixel(1, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*out.get_pixel(2, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_grayscale_no_overflow() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 254, 77]));
        let out = apply_grayscale(img);
        assert_eq!(*out.get_pixel(0, 0), Rgba([254, 254, 254, 77]));
    }

    #[test]
    fn test_color_from_palette() {
        let img = opaque_square(1, Rgba([255, 255, 255, 255]));
        let out = apply_pixel(img, &PixelEffect::Color(ColorSpec::Palette(3, 3)), &assets()).unwrap();
        assert_eq!(*out.get_pixel(0, 0), Rgba([228, 83, 59, 255]));
    }

    #[test]
    fn test_color_outside_palette() {
        let img = opaque_square(1, Rgba([255, 255, 255, 255]));
        let err =
            apply_pixel(img, &PixelEffect::Color(ColorSpec::Palette(9, 9)), &assets()).unwrap_err();
        assert!(err.is_user_facing());
    }

    #[test]
    fn test_inactive_multiplier() {
        let img = opaque_square(1, Rgba([255, 255, 255, 255]));
        let out = apply_pixel(img, &PixelEffect::Inactive, &assets()).unwrap();
        assert_eq!(*out.get_pixel(0, 0), Rgba([200, 200, 200, 255]));
    }

    #[test]
    fn test_property_sits_on_plate() {
        let mut text = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        text.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
        let out = apply_pixel(text, &PixelEffect::Property, &assets()).unwrap();
        assert_eq!(out.dimensions(), (4, 4));
        assert_eq!(*out.get_pixel(0, 0), Rgba([200, 100, 50, 255]));
        assert_eq!(*out.get_pixel(1, 1), Rgba([8, 8, 8, 255]));
    }
}
