//! Isometric frame rendering

use image::{Rgba, RgbaImage};

use crate::error::{Result, UserError};
use crate::models::{FlagSet, Scene, Tile};
use crate::output::scale_image;
use crate::sprites::SpriteSource;
use crate::variants::resolve_pixels;
use crate::variants::types::OUTLINE_COLOR;

use super::blend::blit_sprite;
use super::outline::{outline_layer, with_outline};

/// Half-width of a tile diamond in canvas pixels.
pub const STEP: f64 = 12.0;

/// Number of wobble frames in every animation.
pub const FRAME_COUNT: usize = 3;

/// Default nearest-neighbor upscale applied to finished frames.
pub const DEFAULT_SCALE: u8 = 2;

/// Largest frame side a GIF can carry.
pub const MAX_FRAME_SIDE: u32 = u16::MAX as u32;

/// Lowest RGB value an opaque background may have.
const BACKGROUND_FLOOR: u8 = 16;

/// Canvas size for a scene before upscaling.
///
/// ```
/// use tilescape::composition::canvas_size;
/// use tilescape::models::Scene;
///
/// let scene = Scene { width: 1.0, height: 1.0, ..Scene::default() };
/// assert_eq!(canvas_size(&scene), (72, 48));
/// ```
pub fn canvas_size(scene: &Scene) -> (u32, u32) {
    let w = scene.width;
    let h = scene.height;
    let depth = scene.max_depth - scene.min_depth;
    let width = (w + h + 4.0) * STEP;
    let height = (h + w + 6.0 + 2.0 * depth) * STEP / 2.0;
    (width.ceil().max(1.0) as u32, height.ceil().max(1.0) as u32)
}

/// Upscaled frame size for a scene, or a range error when either side would
/// exceed `max_side`.
///
/// ```
/// use tilescape::composition::frame_size;
/// use tilescape::models::Scene;
///
/// let scene = Scene { width: 1.0, height: 1.0, ..Scene::default() };
/// assert_eq!(frame_size(&scene, 2, 4096).unwrap(), (144, 96));
/// assert!(frame_size(&scene, 2, 100).is_err());
/// ```
pub fn frame_size(
    scene: &Scene,
    scale: u8,
    max_side: u32,
) -> std::result::Result<(u32, u32), UserError> {
    let (width, height) = canvas_size(scene);
    let scaled = |side: u32| side.checked_mul(scale.max(1) as u32).filter(|s| *s <= max_side);
    match (scaled(width), scaled(height)) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(UserError::range(format!(
            "The scene is too large to render (at most {} pixels per side).",
            max_side
        ))),
    }
}

/// Scene-wide values the projection depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub scene_width: f64,
    pub max_depth: f64,
}

impl Projection {
    pub fn for_scene(scene: &Scene) -> Self {
        Self { scene_width: scene.width, max_depth: scene.max_depth }
    }

    /// Top-left canvas position of a sprite drawn for `tile`.
    pub fn place(&self, tile: &Tile, sprite_width: u32, sprite_height: u32) -> (i64, i64) {
        let x = (tile.x + tile.y + 2.0) * STEP - sprite_width as f64 / 2.0;
        let y = (tile.y - tile.x + self.scene_width + 3.0 + 2.0 * self.max_depth) * STEP / 2.0
            - sprite_height as f64 / 2.0
            + tile.metadata.ground_height as f64 * 3.0
            - tile.z * STEP;
        (x.floor() as i64, y.floor() as i64)
    }
}

/// Opaque backgrounds are kept off pure black.
pub fn floor_background(color: Rgba<u8>) -> Rgba<u8> {
    if color[3] < 255 {
        return color;
    }
    let [r, g, b, a] = color.0;
    Rgba([r.max(BACKGROUND_FLOOR), g.max(BACKGROUND_FLOOR), b.max(BACKGROUND_FLOOR), a])
}

/// Render a sorted scene into its wobble frames at the default scale.
pub fn render_scene(
    scene: &mut Scene,
    flags: &FlagSet,
    sprites: &dyn SpriteSource,
) -> Result<[RgbaImage; FRAME_COUNT]> {
    render_scene_scaled(scene, flags, sprites, DEFAULT_SCALE)
}

/// Render a sorted scene into its wobble frames.
///
/// Tiles are drawn in list order, so the scene must already be sorted by
/// [`super::draw_order`]. Frames render in order 0, 1, 2.
#[tracing::instrument(skip_all, fields(tiles = scene.tiles.len()))]
pub fn render_scene_scaled(
    scene: &mut Scene,
    flags: &FlagSet,
    sprites: &dyn SpriteSource,
    scale: u8,
) -> Result<[RgbaImage; FRAME_COUNT]> {
    frame_size(scene, scale, MAX_FRAME_SIDE)?;
    let (width, height) = canvas_size(scene);
    let background = floor_background(flags.background);
    let projection = Projection::for_scene(scene);
    let tiles = &mut scene.tiles;

    let mut render = |wobble: u8| -> Result<RgbaImage> {
        let layer = render_layer(tiles.as_mut_slice(), projection, (width, height), sprites, wobble)?;
        let mut frame = RgbaImage::from_pixel(width, height, background);
        blit_sprite(&mut frame, &outline_layer(&layer, OUTLINE_COLOR), 0, 0);
        blit_sprite(&mut frame, &layer, 0, 0);
        Ok(scale_image(frame, scale))
    };
    let frames = [render(0)?, render(1)?, render(2)?];

    tracing::info!(width, height, scale, "rendered scene");
    Ok(frames)
}

/// Draw every tile for one wobble frame onto a transparent layer.
fn render_layer(
    tiles: &mut [Tile],
    projection: Projection,
    (width, height): (u32, u32),
    sprites: &dyn SpriteSource,
    wobble: u8,
) -> Result<RgbaImage> {
    let mut layer = RgbaImage::new(width, height);
    for tile in tiles.iter_mut() {
        tile.reset_running_variants();
        let Some(sprite) = sprites.get_sprite(tile, wobble)? else {
            continue;
        };

        let mut image = resolve_pixels(&mut tile.running_variants, (*sprite).clone(), sprites)?;
        if tile.metadata.unit {
            image = with_outline(&image, OUTLINE_COLOR);
        }
        let (x, y) = projection.place(tile, image.width(), image.height());
        blit_sprite(&mut layer, &image, x, y);
    }
    Ok(layer)
}
