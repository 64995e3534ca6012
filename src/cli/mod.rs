//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod render;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// tilescape - Render isometric tile scenes to animated GIFs
#[derive(Parser)]
#[command(name = "tscape")]
#[command(about = "tilescape - Render isometric tile scenes to animated GIFs")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to tilescape.toml (default: search upward from the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a scene to an animated GIF
    Render {
        /// Scene file, or `-` to read from stdin
        input: PathBuf,

        /// Output GIF path
        #[arg(short, long)]
        output: PathBuf,

        /// Also write each frame as a PNG into this directory
        #[arg(long)]
        frames_dir: Option<PathBuf>,
    },

    /// Parse a scene and print it as JSON
    Parse {
        /// Scene file, or `-` to read from stdin
        input: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let log_level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    // A subscriber may already be installed when embedded
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Parse arguments and run the requested command.
pub fn run() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_INVALID_ARGS)
            } else {
                ExitCode::from(EXIT_SUCCESS)
            };
        }
    };
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Render { input, output, frames_dir } => {
            render::run_render(&input, &output, frames_dir.as_deref(), cli.config.as_deref())
        }
        Commands::Parse { input } => render::run_parse(&input, cli.config.as_deref()),
    }
}
