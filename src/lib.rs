//! tilescape - Library for rendering isometric tile scenes
//!
//! This library provides functionality to:
//! - Parse a compact scene language into positioned tiles
//! - Apply geometric and pixel-level variant effects
//! - Composite tiles into a three-frame isometric animation
//! - Encode the animation as a looping GIF

pub mod catalog;
pub mod cli;
pub mod color;
pub mod composition;
pub mod config;
pub mod engine;
pub mod error;
pub mod gif;
pub mod glyphs;
pub mod kernel;
pub mod models;
pub mod output;
pub mod parser;
pub mod sprites;
pub mod tokenizer;
pub mod variants;

pub use catalog::{JsonCatalog, MemoryCatalog, TileCatalog};
pub use engine::Engine;
pub use error::{RenderError, Result, UserError};
pub use models::{FlagSet, Scene, Tile, TileMetadata, Variant};
