//! High-level entry point tying catalog, parser, sprites, and output together

use image::RgbaImage;

use crate::catalog::{CatalogError, JsonCatalog, TileCatalog};
use crate::composition::{frame_size, render_scene_scaled};
use crate::config::TilescapeConfig;
use crate::error::Result;
use crate::gif::encode_gif;
use crate::glyphs::GlyphLayoutEngine;
use crate::models::{FlagSet, Scene};
use crate::parser::parse_with;
use crate::sprites::SpriteStore;

/// A configured renderer.
///
/// Engines are `Sync`: the sprite cache is shared between concurrent calls
/// while every call gets its own scene.
///
/// ```no_run
/// use tilescape::config::load_config;
/// use tilescape::Engine;
///
/// let engine = Engine::from_config(load_config(None)?)?;
/// let gif = engine.render_gif("baba is you")?;
/// std::fs::write("scene.gif", gif)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Engine {
    catalog: Box<dyn TileCatalog>,
    sprites: SpriteStore,
    config: TilescapeConfig,
}

impl Engine {
    /// Build an engine around an existing catalog.
    pub fn new(config: TilescapeConfig, catalog: Box<dyn TileCatalog>) -> Self {
        let paths = config.asset_paths();
        let sprites = SpriteStore::new(
            paths.sprites,
            paths.palette,
            paths.plate,
            GlyphLayoutEngine::new(paths.letters),
        );
        Self { catalog, sprites, config }
    }

    /// Build an engine, loading the catalog file named by the config.
    pub fn from_config(config: TilescapeConfig) -> std::result::Result<Self, CatalogError> {
        let paths = config.asset_paths();
        let catalog = JsonCatalog::load(&paths.catalog, &paths.root)?;
        tracing::info!(tiles = catalog.len(), path = %paths.catalog.display(), "loaded catalog");
        Ok(Self::new(config, Box::new(catalog)))
    }

    pub fn config(&self) -> &TilescapeConfig {
        &self.config
    }

    pub fn catalog(&self) -> &dyn TileCatalog {
        self.catalog.as_ref()
    }

    pub fn sprites(&self) -> &SpriteStore {
        &self.sprites
    }

    /// Parse scene text, starting from the configured flag defaults.
    pub fn parse(&self, text: &str) -> Result<(Scene, FlagSet)> {
        Ok(parse_with(text, self.config.default_flags(), self.catalog.as_ref())?)
    }

    /// Parse and render scene text into its animation frames.
    #[tracing::instrument(skip_all)]
    pub fn render(&self, text: &str) -> Result<Vec<RgbaImage>> {
        let (mut scene, flags) = self.parse(text)?;
        self.render_scene(&mut scene, &flags)
    }

    /// Render an already parsed scene.
    ///
    /// Scenes whose frames would exceed `render.max_frame_size` fail with a
    /// range error before any pixels are allocated.
    pub fn render_scene(&self, scene: &mut Scene, flags: &FlagSet) -> Result<Vec<RgbaImage>> {
        let render = &self.config.render;
        frame_size(scene, render.scale, render.max_frame_size)?;
        let frames = render_scene_scaled(scene, flags, &self.sprites, self.config.render.scale)?;
        Ok(frames.into())
    }

    /// Parse and render scene text into GIF bytes.
    pub fn render_gif(&self, text: &str) -> Result<Vec<u8>> {
        let frames = self.render(text)?;
        encode_gif(&frames, self.config.render.frame_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use crate::error::{RenderError, UserError};
    use crate::models::TileMetadata;
    use std::path::PathBuf;

    fn engine(catalog: MemoryCatalog) -> Engine {
        let config = TilescapeConfig { base_dir: PathBuf::from("/nonexistent"), ..Default::default() };
        Engine::new(config, Box::new(catalog))
    }

    #[test]
    fn test_engine_is_sync() {
        fn assert_sync<T: Sync + Send>() {}
        assert_sync::<Engine>();
    }

    #[test]
    fn test_parse_error_is_user_facing() {
        let err = engine(MemoryCatalog::new()).parse("bogus").unwrap_err();
        assert!(err.is_user_facing());
        assert_eq!(err.user_message(), "There's no tile called `bogus`.");
    }

    #[test]
    fn test_missing_sprite_aborts_render() {
        let catalog = MemoryCatalog::new().with("wall", TileMetadata::text("/nonexistent/data"));
        let err = engine(catalog).render("wall").unwrap_err();
        assert!(matches!(err, RenderError::User(UserError::AssetMissing { .. })));
    }

    #[test]
    fn test_empty_scene_renders_background() {
        let frames = engine(MemoryCatalog::new()).render("").unwrap();
        assert_eq!(frames.len(), 3);
        // (0 + 0 + 4) * 12 by (6 * 6), doubled
        assert_eq!(frames[0].dimensions(), (96, 72));
    }
}
