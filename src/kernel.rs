//! Plus-shaped edge kernel and padding helpers
//!
//! The kernel is
//!
//! ```text
//!  0  1  0
//!  1 -4  1
//!  0  1  0
//! ```
//!
//! applied to an alpha channel. Pixels outside the image count as zero and
//! every result saturates to `0..=255`, so a single pass lights up the
//! transparent ring around an opaque shape and darkens its interior.

use image::{GrayImage, Luma, Rgba, RgbaImage};

/// Extract the alpha channel of an image.
pub fn alpha_channel(image: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| Luma([image.get_pixel(x, y)[3]]))
}

/// Apply the plus kernel once.
pub fn convolve_plus(src: &GrayImage) -> GrayImage {
    let (w, h) = src.dimensions();
    let at = |x: i64, y: i64| -> i32 {
        if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
            0
        } else {
            src.get_pixel(x as u32, y as u32)[0] as i32
        }
    };

    GrayImage::from_fn(w, h, |x, y| {
        let (x, y) = (x as i64, y as i64);
        let sum = at(x, y - 1) + at(x - 1, y) + at(x + 1, y) + at(x, y + 1) - 4 * at(x, y);
        Luma([sum.clamp(0, 255) as u8])
    })
}

/// Apply the plus kernel `passes` times.
pub fn convolve_plus_n(src: &GrayImage, passes: u32) -> GrayImage {
    let mut out = src.clone();
    for _ in 0..passes {
        out = convolve_plus(&out);
    }
    out
}

/// Add `size` transparent pixels on every side.
pub fn pad(image: &RgbaImage, size: u32) -> RgbaImage {
    let (w, h) = image.dimensions();
    let mut result = RgbaImage::from_pixel(w + size * 2, h + size * 2, Rgba([0, 0, 0, 0]));
    image::imageops::replace(&mut result, image, size as i64, size as i64);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque_square(size: u32) -> RgbaImage {
        RgbaImage::from_pixel(size, size, Rgba([10, 20, 30, 255]))
    }

    #[test]
    fn test_single_pass_lights_ring_only() {
        let alpha = alpha_channel(&pad(&opaque_square(3), 1));
        let edges = convolve_plus(&alpha);

        // Ring pixels adjacent to the square along an edge
        assert_eq!(edges.get_pixel(2, 0)[0], 255);
        assert_eq!(edges.get_pixel(0, 2)[0], 255);
        // Corners touch no cardinal neighbor
        assert_eq!(edges.get_pixel(0, 0)[0], 0);
        // Interior and inner edge saturate to zero
        assert_eq!(edges.get_pixel(2, 2)[0], 0);
        assert_eq!(edges.get_pixel(1, 2)[0], 0);
    }

    #[test]
    fn test_zero_passes_is_identity() {
        let alpha = alpha_channel(&opaque_square(2));
        assert_eq!(convolve_plus_n(&alpha, 0), alpha);
    }

    #[test]
    fn test_pad_dimensions_and_content() {
        let padded = pad(&opaque_square(2), 3);
        assert_eq!(padded.dimensions(), (8, 8));
        assert_eq!(padded.get_pixel(0, 0)[3], 0);
        assert_eq!(*padded.get_pixel(3, 3), Rgba([10, 20, 30, 255]));
    }
}
