//! Render and parse command implementations

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;

use crate::config::load_config;
use crate::engine::Engine;
use crate::gif::render_gif;
use crate::output::save_frames;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Read scene text from a file, or stdin for `-`.
fn read_scene(input: &Path) -> io::Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        fs::read_to_string(input)
    }
}

/// Load config, catalog, and scene text, reporting failures.
fn prepare(input: &Path, config_path: Option<&Path>) -> Result<(Engine, String), ExitCode> {
    let config = load_config(config_path).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;
    let engine = Engine::from_config(config).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })?;
    let text = read_scene(input).map_err(|e| {
        eprintln!("Error: Cannot read '{}': {}", input.display(), e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;
    Ok((engine, text))
}

/// Execute the render command
pub fn run_render(
    input: &Path,
    output: &Path,
    frames_dir: Option<&Path>,
    config_path: Option<&Path>,
) -> ExitCode {
    let (engine, text) = match prepare(input, config_path) {
        Ok(prepared) => prepared,
        Err(code) => return code,
    };

    let frames = match engine.render(&text) {
        Ok(frames) => frames,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if let Some(dir) = frames_dir {
        let stem = output.file_stem().and_then(|s| s.to_str()).unwrap_or("frame");
        if let Err(e) = save_frames(&frames, dir, stem) {
            eprintln!("Error: {}", e.user_message());
            return ExitCode::from(EXIT_ERROR);
        }
    }

    match render_gif(&frames, engine.config().render.frame_delay_ms, output) {
        Ok(()) => {
            println!("Saved: {}", output.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the parse command
pub fn run_parse(input: &Path, config_path: Option<&Path>) -> ExitCode {
    let (engine, text) = match prepare(input, config_path) {
        Ok(prepared) => prepared,
        Err(code) => return code,
    };

    let scene = match engine.parse(&text) {
        Ok((scene, _)) => scene,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match serde_json::to_string_pretty(&scene) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize scene");
            eprintln!("Error: {}", crate::error::INTERNAL_MESSAGE);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
