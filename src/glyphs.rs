//! Text tiles: laying out glyph bitmaps inside a single 24×24 tile
//!
//! Each letter exists on disk in several pre-drawn widths per letter mode:
//!
//! ```text
//! <letters>/<char>/<mode>_<width>.png
//! ```
//!
//! A word is split into one or two lines, and for every line the engine
//! searches all combinations of per-letter widths and letter spacings for
//! the one whose total width is closest to the mode's target width.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use image::{Rgba, RgbaImage};

use crate::composition::blit_sprite;
use crate::error::{RenderError, Result, UserError};

/// Side length of a rendered text tile.
pub const TILE_SIZE: u32 = 24;

/// Vertical distance between the tops of two lines.
pub const LINE_PITCH: u32 = 12;

/// Letter spacings tried, in tie-break preference order.
const SPACINGS: [u32; 2] = [2, 1];

/// Glyph set and target width used for a word shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterMode {
    /// Mode number used in glyph file names
    pub letters: u8,
    /// Line width the layout search aims for
    pub target_width: u32,
}

/// Big letters for one or two characters.
pub const MODE_SHORT: LetterMode = LetterMode { letters: 2, target_width: 20 };
/// Medium letters for a three-character line.
pub const MODE_LONG: LetterMode = LetterMode { letters: 3, target_width: 22 };
/// Small letters for two stacked lines.
pub const MODE_STACKED: LetterMode = LetterMode { letters: 4, target_width: 22 };

/// Chosen widths and spacing for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineLayout {
    pub widths: Vec<u32>,
    pub spacing: u32,
    pub total_width: u32,
}

/// Split a word into one or two lines.
///
/// An explicit `/` wins; otherwise words longer than three characters are
/// split at the midpoint, with the longer half on top.
///
/// ```
/// use tilescape::glyphs::split_lines;
///
/// assert_eq!(split_lines("baba"), vec!["ba", "ba"]);
/// assert_eq!(split_lines("keke"), vec!["ke", "ke"]);
/// assert_eq!(split_lines("is"), vec!["is"]);
/// assert_eq!(split_lines("a/bcd"), vec!["a", "bcd"]);
/// assert_eq!(split_lines("robot"), vec!["rob", "ot"]);
/// ```
pub fn split_lines(word: &str) -> Vec<String> {
    if let Some((top, bottom)) = word.split_once('/') {
        return [top, bottom].into_iter().filter(|l| !l.is_empty()).map(str::to_string).collect();
    }
    let chars: Vec<char> = word.chars().collect();
    if chars.len() > 3 {
        let mid = chars.len().div_ceil(2);
        vec![chars[..mid].iter().collect(), chars[mid..].iter().collect()]
    } else {
        vec![word.to_string()]
    }
}

/// Pick the letter mode for a set of lines.
pub fn letter_mode(lines: &[String]) -> LetterMode {
    match lines {
        [line] if line.chars().count() <= 2 => MODE_SHORT,
        [_] => MODE_LONG,
        _ => MODE_STACKED,
    }
}

/// Search every width combination and spacing for the best fit.
///
/// Candidates wider than [`TILE_SIZE`] are never chosen. Among the rest the
/// smallest `|total - target|` wins; spacing 2 is tried first and a later
/// candidate must be strictly better to replace the current best, so ties go
/// to the wider spacing and then to the earliest width combination.
///
/// Returns `None` when no combination fits.
pub fn best_layout(choices: &[Vec<u32>], target: u32) -> Option<LineLayout> {
    if choices.is_empty() || choices.iter().any(|c| c.is_empty()) {
        return None;
    }
    let gaps = choices.len() as u32 - 1;

    // Narrowest width letters `i..` can still take
    let mut min_rest = vec![0u32; choices.len() + 1];
    for i in (0..choices.len()).rev() {
        let narrowest = choices[i].iter().copied().min().unwrap_or(0);
        min_rest[i] = min_rest[i + 1].saturating_add(narrowest);
    }
    if min_rest[0].saturating_add(gaps) > TILE_SIZE {
        return None;
    }

    let mut search = LayoutSearch {
        choices,
        min_rest: &min_rest,
        target,
        widths: Vec::with_capacity(choices.len()),
        best: None,
    };
    for spacing in SPACINGS {
        search.visit(spacing * gaps, spacing);
    }
    search.best.map(|(_, layout)| layout)
}

/// Depth-first walk over width choices, first letter slowest.
struct LayoutSearch<'a> {
    choices: &'a [Vec<u32>],
    min_rest: &'a [u32],
    target: u32,
    widths: Vec<u32>,
    best: Option<(u32, LineLayout)>,
}

impl LayoutSearch<'_> {
    /// `used` is the width taken so far, all gaps included.
    fn visit(&mut self, used: u32, spacing: u32) {
        let depth = self.widths.len();
        let choices = self.choices;
        if depth == choices.len() {
            let score = used.abs_diff(self.target);
            if self.best.as_ref().map_or(true, |(s, _)| score < *s) {
                let widths = self.widths.clone();
                self.best = Some((score, LineLayout { widths, spacing, total_width: used }));
            }
            return;
        }

        for &w in &choices[depth] {
            let used = used.saturating_add(w);
            // Branches that can no longer fit the tile are cut here
            if used.saturating_add(self.min_rest[depth + 1]) > TILE_SIZE {
                continue;
            }
            self.widths.push(w);
            self.visit(used, spacing);
            self.widths.pop();
        }
    }
}

/// Renders `text_` tiles from glyph files.
#[derive(Debug)]
pub struct GlyphLayoutEngine {
    letters_dir: PathBuf,
    widths: Mutex<HashMap<(char, u8), Vec<u32>>>,
}

impl GlyphLayoutEngine {
    pub fn new(letters_dir: impl Into<PathBuf>) -> Self {
        Self { letters_dir: letters_dir.into(), widths: Mutex::new(HashMap::new()) }
    }

    pub fn letters_dir(&self) -> &Path {
        &self.letters_dir
    }

    /// Render a word into a 24×24 bitmap.
    #[tracing::instrument(skip(self))]
    pub fn render_text(&self, word: &str) -> Result<RgbaImage> {
        let lines = split_lines(word);
        if lines.is_empty() || word.is_empty() {
            return Err(UserError::layout("Text tiles need at least one letter.").into());
        }
        let mode = letter_mode(&lines);

        let mut placed = Vec::with_capacity(lines.len());
        for line in &lines {
            let letters: Vec<char> = line.chars().collect();
            let mut choices = Vec::with_capacity(letters.len());
            for &c in &letters {
                let widths = self.available_widths(c, mode.letters)?;
                if widths.is_empty() {
                    return Err(
                        UserError::layout(format!("I can't write the letter `{}`.", c)).into()
                    );
                }
                choices.push(widths);
            }
            let layout = best_layout(&choices, mode.target_width).ok_or_else(|| {
                UserError::layout(format!("The text `{}` is too long to fit in a tile.", word))
            })?;
            tracing::debug!(line = %line, widths = ?layout.widths, spacing = layout.spacing, "laid out line");

            let mut glyphs = Vec::with_capacity(letters.len());
            for (&c, &w) in letters.iter().zip(&layout.widths) {
                glyphs.push(self.load_glyph(c, mode.letters, w)?);
            }
            placed.push((layout, glyphs));
        }

        Ok(compose_lines(&placed))
    }

    /// Widths available on disk for a letter in a mode, ascending.
    fn available_widths(&self, c: char, mode: u8) -> Result<Vec<u32>> {
        let mut cache = self.widths.lock().map_err(|_| RenderError::CachePoisoned)?;
        if let Some(widths) = cache.get(&(c, mode)) {
            return Ok(widths.clone());
        }

        let dir = self.letters_dir.join(c.to_string());
        let mut widths = Vec::new();
        if !std::path::is_separator(c) && dir.is_dir() {
            let prefix = format!("{}_", mode);
            for entry in fs::read_dir(&dir)? {
                let name = entry?.file_name();
                let Some(name) = name.to_str() else { continue };
                let width = name
                    .strip_suffix(".png")
                    .and_then(|stem| stem.strip_prefix(&prefix))
                    .and_then(|w| w.parse::<u32>().ok());
                if let Some(width) = width {
                    widths.push(width);
                }
            }
        }
        widths.sort_unstable();
        widths.dedup();
        cache.insert((c, mode), widths.clone());
        Ok(widths)
    }

    fn load_glyph(&self, c: char, mode: u8, width: u32) -> Result<RgbaImage> {
        let path = self.letters_dir.join(c.to_string()).join(format!("{}_{}.png", mode, width));
        if !path.is_file() {
            return Err(UserError::AssetMissing {
                tile: format!("letter {}", c),
                path: path.display().to_string(),
            }
            .into());
        }
        Ok(image::open(&path)?.to_rgba8())
    }
}

/// Center the laid-out lines inside a blank tile.
fn compose_lines(lines: &[(LineLayout, Vec<RgbaImage>)]) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(TILE_SIZE, TILE_SIZE, Rgba([0, 0, 0, 0]));
    let last_height = lines
        .last()
        .map(|(_, glyphs)| glyphs.iter().map(|g| g.height()).max().unwrap_or(0))
        .unwrap_or(0);
    let block_height = LINE_PITCH * (lines.len() as u32).saturating_sub(1) + last_height;
    let top = TILE_SIZE.saturating_sub(block_height) / 2;

    for (row, (layout, glyphs)) in lines.iter().enumerate() {
        let y = (top + row as u32 * LINE_PITCH) as i64;
        let mut x = (TILE_SIZE.saturating_sub(layout.total_width) / 2) as i64;
        for (glyph, width) in glyphs.iter().zip(&layout.widths) {
            blit_sprite(&mut canvas, glyph, x, y);
            x += (*width + layout.spacing) as i64;
        }
    }
    canvas
}
