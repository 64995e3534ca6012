//! tscape - Command-line tool for rendering isometric tile scenes

use std::process::ExitCode;

use tilescape::cli;

fn main() -> ExitCode {
    cli::run()
}
