//! Criterion benchmarks for tilescape critical paths
//!
//! Benchmarks the core performance-critical operations:
//! - Parser: flag extraction and grid parsing
//! - Glyphs: width search for text tiles
//! - Variants: meta outlines on a sprite
//! - Compositor: full three-frame scene render

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{Rgba, RgbaImage};
use tilescape::catalog::MemoryCatalog;
use tilescape::composition::render_scene;
use tilescape::error::Result;
use tilescape::glyphs::best_layout;
use tilescape::models::{FlagSet, Tile, TileMetadata};
use tilescape::parser::parse;
use tilescape::sprites::SpriteSource;
use tilescape::variants::{apply_meta, VariantAssets};

// =============================================================================
// Test Data Generators
// =============================================================================

const NAMES: [&str; 4] = ["baba", "wall", "rock", "flag"];

fn make_catalog() -> MemoryCatalog {
    let mut catalog = MemoryCatalog::new();
    for name in NAMES.iter().chain(["terrain_0"].iter()) {
        catalog.insert(
            *name,
            TileMetadata {
                directional: false,
                ground_height: 0,
                frame_count: 3,
                unit: *name == "baba",
                asset_directory: "data".to_string(),
            },
        );
    }
    catalog
}

/// Generate a square scene with stacked and variant-bearing cells
fn make_scene(size: usize) -> String {
    (0..size)
        .map(|y| {
            (0..size)
                .map(|x| match (x + y) % 4 {
                    0 => "baba:m/2".to_string(),
                    1 => "wall&rock".to_string(),
                    2 => "rock|flag:displace/0/0/1".to_string(),
                    _ => ".".to_string(),
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Sprite source that hands out one generated bitmap for every tile
struct GeneratedSprites {
    sprite: Arc<RgbaImage>,
}

impl GeneratedSprites {
    fn new() -> Self {
        let sprite = RgbaImage::from_fn(24, 24, |x, y| {
            if (4..20).contains(&x) && (4..20).contains(&y) {
                Rgba([(x * 10) as u8, (y * 10) as u8, 128, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        Self { sprite: Arc::new(sprite) }
    }
}

impl VariantAssets for GeneratedSprites {
    fn palette(&self) -> Result<Arc<RgbaImage>> {
        Ok(Arc::clone(&self.sprite))
    }

    fn plate(&self) -> Result<Arc<RgbaImage>> {
        Ok(Arc::clone(&self.sprite))
    }
}

impl SpriteSource for GeneratedSprites {
    fn get_sprite(&self, _tile: &Tile, _wobble: u8) -> Result<Option<Arc<RgbaImage>>> {
        Ok(Some(Arc::clone(&self.sprite)))
    }
}

// =============================================================================
// Parser Benchmarks
// =============================================================================

fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");
    let catalog = make_catalog();

    for size in [4usize, 16, 32] {
        let text = format!("--bg=#202020 {}", make_scene(size));
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::new("parse", size), &text, |b, text| {
            b.iter(|| parse(black_box(text), &catalog))
        });
    }

    group.finish();
}

// =============================================================================
// Glyph Layout Benchmarks
// =============================================================================

fn bench_glyphs(c: &mut Criterion) {
    let mut group = c.benchmark_group("glyphs");

    let short: Vec<Vec<u32>> = vec![vec![7, 8, 9, 10]; 2];
    group.bench_function("best_layout_2_letters", |b| {
        b.iter(|| best_layout(black_box(&short), 20))
    });

    let long: Vec<Vec<u32>> = vec![vec![4, 5, 6, 7, 8]; 3];
    group.bench_function("best_layout_3_letters", |b| {
        b.iter(|| best_layout(black_box(&long), 22))
    });

    group.finish();
}

// =============================================================================
// Variant Benchmarks
// =============================================================================

fn bench_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("variants");
    let sprite = GeneratedSprites::new().sprite;

    for level in [1u32, 4, 16] {
        group.bench_with_input(BenchmarkId::new("meta", level), &level, |b, &level| {
            b.iter(|| apply_meta(black_box(&sprite), level))
        });
    }

    group.finish();
}

// =============================================================================
// Compositor Benchmarks
// =============================================================================

fn bench_compositor(c: &mut Criterion) {
    let mut group = c.benchmark_group("compositor");
    group.sample_size(20);
    let catalog = make_catalog();
    let sprites = GeneratedSprites::new();

    for size in [4usize, 10] {
        let Ok((scene, flags)) = parse(&make_scene(size), &catalog) else {
            continue;
        };
        group.throughput(Throughput::Elements(scene.tiles.len() as u64));
        group.bench_with_input(BenchmarkId::new("render_scene", size), &scene, |b, scene| {
            b.iter(|| {
                let mut scene = scene.clone();
                render_scene(&mut scene, black_box(&flags), &sprites)
            })
        });
    }

    let mut flags = FlagSet::default();
    flags.background = Rgba([0, 0, 0, 0]);
    if let Ok((scene, _)) = parse(&make_scene(6), &catalog) {
        group.bench_function("render_scene_transparent", |b| {
            b.iter(|| {
                let mut scene = scene.clone();
                render_scene(&mut scene, &flags, &sprites)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parser, bench_glyphs, bench_variants, bench_compositor);
criterion_main!(benches);
