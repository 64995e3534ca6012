//! Back-to-front draw order for isometric tiles

use std::cmp::Ordering;

use crate::models::Tile;

/// Compare two tiles by draw order.
///
/// Tiles further back on the `y - x` diagonal draw first; ties go to the
/// lower `z`, then the lower pixel layer `p`. Uses `total_cmp`, so the order
/// is total even for unusual float values.
pub fn draw_order(a: &Tile, b: &Tile) -> Ordering {
    (a.y - a.x)
        .total_cmp(&(b.y - b.x))
        .then_with(|| a.z.total_cmp(&b.z))
        .then_with(|| a.p.total_cmp(&b.p))
}

/// Stable in-place sort by [`draw_order`].
pub fn sort_tiles(tiles: &mut [Tile]) {
    tiles.sort_by(draw_order);
}
