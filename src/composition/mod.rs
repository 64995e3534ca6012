//! Isometric composition: draw order, outlines, and frame rendering

mod blend;
mod order;
mod outline;
mod render;

// Re-export public API
pub use blend::blit_sprite;
pub use order::{draw_order, sort_tiles};
pub use outline::{outline_layer, with_outline};
pub use render::{
    canvas_size, floor_background, frame_size, render_scene, render_scene_scaled, Projection,
    DEFAULT_SCALE, FRAME_COUNT, MAX_FRAME_SIDE, STEP,
};
