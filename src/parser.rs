//! Scene text parsing
//!
//! A scene is a grid of stacks. Rows are separated by newlines and stacks by
//! runs of spaces. Each stack has the shape
//!
//! ```text
//! [terrain%]cell|cell&cell|cell...
//! ```
//!
//! where `&` starts the next depth step and `|` the next pixel layer inside a
//! step. A cell is a tile name followed by `:variant/arg` suffixes. A
//! backslash escapes the next character so that it is never a separator.
//!
//! Global flags (`-name`, `--name`, `--name=value`) may appear anywhere as
//! whitespace-separated words and are stripped before the grid is read.

use std::sync::OnceLock;

use regex::Regex;

use crate::catalog::TileCatalog;
use crate::color::parse_color;
use crate::composition::sort_tiles;
use crate::error::UserError;
use crate::models::{FlagSet, Scene, Tile, TileMetadata, Variant};
use crate::tokenizer::{split_once_unescaped, split_unescaped, unescape};
use crate::variants::resolve_geometry;

type ParseResult<T> = std::result::Result<T, UserError>;

fn flag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"--?([^=\s]+)(?:=(\S+))?").expect("flag pattern is valid"))
}

/// Strip global flags from scene text.
///
/// A flag only counts when it is a whole word: preceded by the start of a
/// line or whitespace and followed by whitespace or the end of the line.
/// Lines that held nothing but flags are removed so they do not shift the
/// grid.
///
/// ```
/// use tilescape::parser::extract_flags;
///
/// let (flags, rest) = extract_flags("--ground=#grass baba --bg=#000000").unwrap();
/// assert_eq!(flags.default_ground, "terrain_grass");
/// assert_eq!(rest.trim(), "baba");
/// ```
pub fn extract_flags(text: &str) -> ParseResult<(FlagSet, String)> {
    extract_flags_with(text, FlagSet::default())
}

/// Like [`extract_flags`], starting from configured defaults.
#[tracing::instrument(skip_all)]
pub fn extract_flags_with(text: &str, defaults: FlagSet) -> ParseResult<(FlagSet, String)> {
    let mut flags = defaults;
    let mut kept_lines = Vec::new();

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let mut remaining = String::with_capacity(line.len());
        let mut cursor = 0;
        let mut found = false;

        for m in flag_pattern().captures_iter(line) {
            let Some(whole) = m.get(0) else { continue };
            let starts_word = line[..whole.start()].chars().next_back().map_or(true, char::is_whitespace);
            let ends_word = line[whole.end()..].chars().next().map_or(true, char::is_whitespace);
            if !starts_word || !ends_word {
                continue;
            }
            found = true;
            let key = m.get(1).map_or("", |k| k.as_str());
            let value = m.get(2).map(|v| v.as_str());
            apply_flag(&mut flags, key, value)?;

            remaining.push_str(&line[cursor..whole.start()]);
            cursor = whole.end();
        }
        remaining.push_str(&line[cursor..]);

        if found && remaining.trim().is_empty() {
            continue;
        }
        kept_lines.push(remaining);
    }
    Ok((flags, kept_lines.join("\n")))
}

fn apply_flag(flags: &mut FlagSet, key: &str, value: Option<&str>) -> ParseResult<()> {
    match key {
        "ground" | "g" => {
            let value = value
                .ok_or_else(|| UserError::argument("The `ground` flag needs a tile, like `--ground=#grass`."))?;
            flags.default_ground = cell_name(&unescape(value));
            flags.ground_is_explicit = true;
        }
        "bg" | "background" => {
            let value = value
                .ok_or_else(|| UserError::argument("The `bg` flag needs a color, like `--bg=#RRGGBB`."))?;
            flags.background = parse_color(value).map_err(|e| {
                UserError::argument(format!("Invalid background color `{}`: {}", value, e))
            })?;
        }
        other => tracing::debug!(flag = %other, "ignoring unknown flag"),
    }
    Ok(())
}

/// Expand the `$` and `#` name shorthands.
///
/// ```
/// use tilescape::parser::cell_name;
///
/// assert_eq!(cell_name("$baba"), "text_baba");
/// assert_eq!(cell_name("#grass"), "terrain_grass");
/// assert_eq!(cell_name("wall"), "wall");
/// ```
pub fn cell_name(name: &str) -> String {
    if let Some(text) = name.strip_prefix('$') {
        format!("text_{}", text)
    } else if let Some(terrain) = name.strip_prefix('#') {
        format!("terrain_{}", terrain)
    } else {
        name.to_string()
    }
}

/// A cell split into its expanded name and variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub name: String,
    pub variants: Vec<Variant>,
}

/// Parse one cell. Returns `None` for empty cells (`.` or nothing).
///
/// ```
/// use tilescape::parser::parse_cell;
///
/// let cell = parse_cell(r"$a\:b:red").unwrap();
/// assert_eq!(cell.name, "text_a:b");
/// assert_eq!(cell.variants[0].name, "red");
/// assert!(parse_cell(".").is_none());
/// ```
pub fn parse_cell(raw: &str) -> Option<Cell> {
    let mut pieces = split_unescaped(raw, ':').into_iter();
    let name = unescape(&pieces.next().unwrap_or_default());
    if name.is_empty() || name == "." {
        return None;
    }
    let variants = pieces.map(|v| Variant::parse(&unescape(&v))).collect();
    Some(Cell { name: cell_name(&name), variants })
}

/// Running bounding envelope of placed tiles.
#[derive(Debug, Clone, Copy, Default)]
struct Bounds {
    seen: bool,
    width: f64,
    height: f64,
    min_depth: f64,
    max_depth: f64,
    pixel_depth: f64,
}

impl Bounds {
    fn include(&mut self, tile: &Tile) {
        if !self.seen {
            *self = Bounds {
                seen: true,
                width: tile.x,
                height: tile.y,
                min_depth: tile.z,
                max_depth: tile.z,
                pixel_depth: tile.p,
            };
            return;
        }
        self.width = self.width.max(tile.x);
        self.height = self.height.max(tile.y);
        self.min_depth = self.min_depth.min(tile.z);
        self.max_depth = self.max_depth.max(tile.z);
        self.pixel_depth = self.pixel_depth.max(tile.p);
    }
}

/// Turns cells into tiles against a catalog.
struct SceneBuilder<'a> {
    catalog: &'a dyn TileCatalog,
    tiles: Vec<Tile>,
    bounds: Bounds,
}

impl SceneBuilder<'_> {
    fn metadata(&self, name: &str) -> Option<TileMetadata> {
        self.catalog.lookup(name).or_else(|| {
            // Text is drawn from glyphs, so it needs no catalog entry
            name.starts_with("text_").then(|| TileMetadata::text(""))
        })
    }

    /// Place a cell, returning the catalog ground height of the new tile.
    fn place(&mut self, raw: &str, position: (f64, f64, f64, f64)) -> ParseResult<Option<i32>> {
        let Some(cell) = parse_cell(raw) else {
            return Ok(None);
        };
        let metadata = self
            .metadata(&cell.name)
            .ok_or_else(|| UserError::UnresolvedTile(cell.name.clone()))?;
        let ground_height = metadata.ground_height;

        let mut tile = Tile::new(cell.name, position, cell.variants, metadata);
        resolve_geometry(&mut tile)?;
        self.bounds.include(&tile);
        self.tiles.push(tile);
        Ok(Some(ground_height))
    }

    fn place_stack(
        &mut self,
        stack: &str,
        x: f64,
        y: f64,
        flags: &FlagSet,
    ) -> ParseResult<()> {
        let (terrain, body, terrain_required) = match split_once_unescaped(stack, '%') {
            Some((terrain, body)) => (terrain, body, true),
            None => (flags.default_ground.clone(), stack.to_string(), flags.ground_is_explicit),
        };

        let mut ground_offset = 0;
        for (z, step) in split_unescaped(&body, '&').iter().enumerate() {
            for (p, layer) in split_unescaped(step, '|').iter().enumerate() {
                if let Some(height) = self.place(layer, (x, y, z as f64, p as f64))? {
                    ground_offset = ground_offset.max(height);
                }
            }
        }

        let terrain_z = -1.0 - ground_offset as f64 / 4.0;
        for (p, floor) in split_unescaped(&terrain, '|').iter().enumerate() {
            if !terrain_required {
                let known = parse_cell(floor).map_or(true, |c| self.metadata(&c.name).is_some());
                if !known {
                    continue;
                }
            }
            self.place(floor, (x, y, terrain_z, p as f64))?;
        }
        Ok(())
    }
}

/// Parse flag-free scene text into a sorted, bounded scene.
///
/// Every tile runs through the geometric variant pass as it is created, so
/// the bounds cover displaced positions. The implicit default ground is
/// skipped when the catalog has no entry for it; ground named by a flag or a
/// `terrain%` prefix must exist.
#[tracing::instrument(skip_all)]
pub fn parse_scene(text: &str, flags: &FlagSet, catalog: &dyn TileCatalog) -> ParseResult<Scene> {
    let mut builder = SceneBuilder { catalog, tiles: Vec::new(), bounds: Bounds::default() };

    for (y, row) in text.split('\n').enumerate() {
        let row = row.strip_suffix('\r').unwrap_or(row);
        for (x, stack) in row.split_whitespace().enumerate() {
            builder.place_stack(stack, x as f64, y as f64, flags)?;
        }
    }

    let SceneBuilder { mut tiles, bounds, .. } = builder;
    sort_tiles(&mut tiles);
    tracing::debug!(tiles = tiles.len(), "parsed scene");
    Ok(Scene {
        width: bounds.width,
        height: bounds.height,
        min_depth: bounds.min_depth,
        max_depth: bounds.max_depth,
        pixel_depth: bounds.pixel_depth,
        tiles,
    })
}

/// Extract flags and parse the rest of the text.
pub fn parse(text: &str, catalog: &dyn TileCatalog) -> ParseResult<(Scene, FlagSet)> {
    parse_with(text, FlagSet::default(), catalog)
}

/// Like [`parse`], starting from configured flag defaults.
pub fn parse_with(
    text: &str,
    defaults: FlagSet,
    catalog: &dyn TileCatalog,
) -> ParseResult<(Scene, FlagSet)> {
    let (flags, grid) = extract_flags_with(text, defaults)?;
    let scene = parse_scene(&grid, &flags, catalog)?;
    Ok((scene, flags))
}
