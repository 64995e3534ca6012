//! Integration tests for the tscape CLI
//!
//! These tests run the binary against a temporary asset tree and check exit
//! codes, output files, and messages.

mod support;

use std::fs;
use std::process::{Command, Output};

use support::{AssetTree, RED};

fn tscape(tree: &AssetTree, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tscape"))
        .arg("--config")
        .arg(tree.config_path())
        .args(args)
        .current_dir(tree.root())
        .output()
        .expect("failed to run tscape")
}

fn grass_tree() -> AssetTree {
    let tree = AssetTree::new();
    tree.catalog(r#"{"grass": {}}"#);
    tree.sprite("grass_1.png", 4, RED);
    fs::write(tree.root().join("scene.txt"), "grass grass\ngrass").unwrap();
    tree
}

#[test]
fn test_render_writes_gif() {
    let tree = grass_tree();
    let output = tscape(&tree, &["render", "scene.txt", "-o", "out/scene.gif"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let gif = tree.root().join("out/scene.gif");
    assert!(gif.exists());
    assert_eq!(&fs::read(&gif).unwrap()[..6], b"GIF89a");
}

#[test]
fn test_render_writes_frames() {
    let tree = grass_tree();
    let output =
        tscape(&tree, &["render", "scene.txt", "-o", "scene.gif", "--frames-dir", "frames"]);

    assert!(output.status.success());
    for n in 1..=3 {
        let frame = tree.root().join(format!("frames/scene_{}.png", n));
        assert!(frame.exists(), "missing {}", frame.display());
    }
}

#[test]
fn test_unknown_tile_exits_with_message() {
    let tree = grass_tree();
    fs::write(tree.root().join("bad.txt"), "grass bogus").unwrap();
    let output = tscape(&tree, &["render", "bad.txt", "-o", "bad.gif"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("There's no tile called `bogus`."));
    assert!(!tree.root().join("bad.gif").exists());
}

#[test]
fn test_missing_output_is_invalid_args() {
    let tree = grass_tree();
    let output = tscape(&tree, &["render", "scene.txt"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_missing_input_is_invalid_args() {
    let tree = grass_tree();
    let output = tscape(&tree, &["render", "nope.txt", "-o", "x.gif"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_parse_prints_scene_json() {
    let tree = grass_tree();
    let output = tscape(&tree, &["parse", "scene.txt"]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["tiles"].as_array().unwrap().len(), 3);
    assert_eq!(json["width"], 1.0);
    assert_eq!(json["height"], 1.0);
    assert_eq!(json["tiles"][0]["name"], "grass");
}
