//! Dark outline synthesis around opaque shapes

use image::{Rgba, RgbaImage};

use crate::kernel::{alpha_channel, convolve_plus, pad};

use super::blend::blit_sprite;

/// Build a layer holding only the outline of `image`.
///
/// The edge strength of each transparent pixel scales `color`; pixels that
/// are already opaque in `image` stay transparent.
pub fn outline_layer(image: &RgbaImage, color: Rgba<u8>) -> RgbaImage {
    let edges = convolve_plus(&alpha_channel(image));
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        if image.get_pixel(x, y)[3] > 0 {
            return Rgba([0, 0, 0, 0]);
        }
        let strength = edges.get_pixel(x, y)[0] as u16;
        let mut out = [0u8; 4];
        for c in 0..4 {
            out[c] = (strength * color[c] as u16 / 255) as u8;
        }
        Rgba(out)
    })
}

/// Pad by one pixel and draw `image` over its own outline.
pub fn with_outline(image: &RgbaImage, color: Rgba<u8>) -> RgbaImage {
    let padded = pad(image, 1);
    let mut result = outline_layer(&padded, color);
    blit_sprite(&mut result, &padded, 0, 0);
    result
}
