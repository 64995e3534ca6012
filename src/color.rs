//! Color parsing and palette utilities
//!
//! Supports the following formats:
//! - Hex: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! - `transparent`
//! - Palette coordinates: `x,y` or two digits `xy`
//! - Named palette colors: `red`, `blue`, `silver`, etc.

use image::{Rgba, RgbaImage};
use thiserror::Error;

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Input string doesn't start with '#'
    #[error("color must start with '#'")]
    MissingHash,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
}

/// Named colors and their coordinates in the palette image.
const COLOR_NAMES: &[(&str, (u32, u32))] = &[
    ("white", (6, 0)),
    ("silver", (4, 0)),
    ("gray", (2, 0)),
    ("grey", (2, 0)),
    ("black", (0, 0)),
    ("orange", (6, 3)),
    ("pink", (7, 3)),
    ("purple", (7, 4)),
    ("brown", (1, 2)),
    ("yellow", (2, 5)),
    ("red", (3, 3)),
    ("green", (3, 4)),
    ("lime", (4, 4)),
    ("cyan", (6, 1)),
    ("blue", (4, 1)),
];

/// Parse a hex color or `transparent` into an RGBA color.
///
/// # Examples
///
/// ```
/// use tilescape::color::parse_color;
///
/// assert_eq!(parse_color("#F00").unwrap(), image::Rgba([255, 0, 0, 255]));
/// assert_eq!(parse_color("#404464").unwrap(), image::Rgba([0x40, 0x44, 0x64, 255]));
/// assert_eq!(parse_color("transparent").unwrap(), image::Rgba([0, 0, 0, 0]));
/// ```
pub fn parse_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    if s.is_empty() {
        return Err(ColorError::Empty);
    }
    if s.eq_ignore_ascii_case("transparent") {
        return Ok(Rgba([0, 0, 0, 0]));
    }
    let hex = s.strip_prefix('#').ok_or(ColorError::MissingHash)?;
    if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(c));
    }

    // All characters are ASCII hex digits from here on
    let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).unwrap_or(0);
    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);

    match hex.len() {
        3 => Ok(Rgba([digit(0) * 17, digit(1) * 17, digit(2) * 17, 255])),
        4 => Ok(Rgba([digit(0) * 17, digit(1) * 17, digit(2) * 17, digit(3) * 17])),
        6 => Ok(Rgba([pair(0), pair(2), pair(4), 255])),
        8 => Ok(Rgba([pair(0), pair(2), pair(4), pair(6)])),
        len => Err(ColorError::InvalidLength(len)),
    }
}

/// Look up a named color's palette coordinate.
pub fn named_color(name: &str) -> Option<(u32, u32)> {
    let lower = name.to_ascii_lowercase();
    COLOR_NAMES.iter().find(|(n, _)| *n == lower).map(|(_, coord)| *coord)
}

/// Parse a palette coordinate written as `x,y` or as two digits `xy`.
///
/// ```
/// use tilescape::color::parse_palette_coord;
///
/// assert_eq!(parse_palette_coord("2,5"), Some((2, 5)));
/// assert_eq!(parse_palette_coord("25"), Some((2, 5)));
/// assert_eq!(parse_palette_coord("red"), None);
/// ```
pub fn parse_palette_coord(s: &str) -> Option<(u32, u32)> {
    if let Some((x, y)) = s.split_once(',') {
        return Some((x.trim().parse().ok()?, y.trim().parse().ok()?));
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(x), Some(y), None) => Some((x.to_digit(10)?, y.to_digit(10)?)),
        _ => None,
    }
}

/// Multiply every pixel by an RGBA color (0-255 per channel).
pub fn multiply(image: &mut RgbaImage, color: Rgba<u8>) {
    for pixel in image.pixels_mut() {
        for c in 0..4 {
            pixel[c] = ((pixel[c] as u16 * color[c] as u16) / 255) as u8;
        }
    }
}
