//! Recognized variant effects
//!
//! Variants arrive as free-form `name/arg/...` records. The ones the engine
//! understands are parsed into one of two enums: [`GeometricEffect`] for
//! effects that move or reorient a tile, and [`PixelEffect`] for effects that
//! rewrite its bitmap.

use image::Rgba;

/// Largest accepted `meta` level.
pub const META_LIMIT: u32 = 16;

/// Multiplier applied by `inactive`.
pub const INACTIVE_COLOR: Rgba<u8> = Rgba([200, 200, 200, 255]);

/// Near-black used for outlines and property text.
pub const OUTLINE_COLOR: Rgba<u8> = Rgba([8, 8, 8, 255]);

/// An effect applied once, right after the tile is parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometricEffect {
    /// Shift the tile by a continuous offset
    Displace { dx: f64, dy: f64, dz: f64 },
    /// Toggle the unit outline
    Unit,
    /// Face a fixed direction (d=0, r=1, u=2, l=3)
    Face(u8),
}

/// How a `color` variant names its multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpec {
    /// Literal `#RRGGBB`
    Rgba(Rgba<u8>),
    /// Pixel coordinate in the palette image
    Palette(u32, u32),
}

/// An effect applied to the rendered bitmap every frame.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelEffect {
    /// Outline (odd levels) or outline plus fill (even levels)
    Meta { level: u32 },
    /// Per-channel contrast stretch
    Clean,
    /// Multiply by a color
    Color(ColorSpec),
    /// Multiply by [`INACTIVE_COLOR`]
    Inactive,
    /// Dark text on the property plate
    Property,
    /// Two-tone black and white rendering
    Noun,
    /// Average RGB into gray
    Grayscale,
}

/// Map a direction token to its orientation code.
pub fn orientation_code(name: &str) -> Option<u8> {
    match name {
        "d" => Some(0),
        "r" => Some(1),
        "u" => Some(2),
        "l" => Some(3),
        _ => None,
    }
}
