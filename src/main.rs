//! Binary entry point for the `lz4blk` command-line tool.
//!
//! Parses the command line with clap and dispatches to
//! [`lz4blk::cli::commands::run`]. Errors are printed with their context
//! chain at display level 1 and turn into exit code 1.

use std::process::ExitCode;

use clap::Parser;

use lz4blk::cli::args::Cli;
use lz4blk::cli::commands::run;
use lz4blk::displaylevel;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            displaylevel!(1, "Error: {:#}\n", err);
            ExitCode::FAILURE
        }
    }
}
