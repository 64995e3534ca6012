//! Variant pipeline: named effects attached to tiles
//!
//! Variants are resolved in two passes:
//!
//! - [`resolve_geometry`] runs once per tile right after parsing. It consumes
//!   `displace`, `unit`, and the direction tokens from the canonical list and
//!   mutates the tile.
//! - [`resolve_pixels`] runs once per frame on a fresh working copy of the
//!   canonical list and rewrites the tile's bitmap. Recognized tokens are
//!   removed from the working copy; unknown ones are left in place.
//!
//! # Module Structure
//!
//! - [`types`] - Effect enums and fixed constants
//! - [`parsing`] - Per-effect argument validation
//! - [`apply`] - Effect application to tiles and bitmaps

pub mod apply;
pub mod parsing;
pub mod types;

use std::sync::Arc;

use image::RgbaImage;

use crate::error::{Result, UserError};
use crate::models::{Tile, Variant};

pub use apply::{apply_geometric, apply_meta, apply_pixel, opaque_histogram};
pub use parsing::{parse_geometric, parse_pixel};
pub use types::{ColorSpec, GeometricEffect, PixelEffect, META_LIMIT};

/// Shared images some pixel effects need.
pub trait VariantAssets {
    /// Palette image indexed by `color` coordinates.
    fn palette(&self) -> Result<Arc<RgbaImage>>;
    /// Background sprite used by `property`.
    fn plate(&self) -> Result<Arc<RgbaImage>>;
}

/// Run the geometric pass over a tile's canonical variants.
///
/// Geometric variants are applied in order and removed; everything else is
/// kept, in order, for the pixel pass.
pub fn resolve_geometry(tile: &mut Tile) -> std::result::Result<(), UserError> {
    let variants = std::mem::take(&mut tile.variants);
    let mut remaining = Vec::with_capacity(variants.len());
    for variant in variants {
        match parse_geometric(&variant)? {
            Some(effect) => apply_geometric(tile, &effect),
            None => remaining.push(variant),
        }
    }
    tile.variants = remaining;
    Ok(())
}

/// Run the pixel pass over a working variant list.
///
/// Recognized variants are applied in token order and removed from
/// `running`. Any error aborts the whole pass.
pub fn resolve_pixels<A: VariantAssets + ?Sized>(
    running: &mut Vec<Variant>,
    mut image: RgbaImage,
    assets: &A,
) -> Result<RgbaImage> {
    let mut remaining = Vec::with_capacity(running.len());
    for variant in running.drain(..) {
        match parse_pixel(&variant)? {
            Some(effect) => image = apply_pixel(image, &effect, assets)?,
            None => {
                tracing::debug!(variant = %variant.name, "ignoring unknown variant");
                remaining.push(variant);
            }
        }
    }
    *running = remaining;
    Ok(image)
}
