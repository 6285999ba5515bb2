//! Command-line interface for the `lz4blk` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`constants`] | Program identity, the shared `DISPLAY_LEVEL` atomic and the display macros. |
//! | [`arg_utils`] | Size parsing (`64K`, `4MiB`) and default output names. |
//! | [`env`]       | Defaults read from `LZ4BLK_ACCELERATION` / `LZ4BLK_NBWORKERS`. |
//! | [`args`]      | The clap definition: `compress`, `decompress`, `bench`. |
//! | [`commands`]  | Subcommand implementations. |
//! | [`bench`]     | Parallel in-memory benchmark. |
//!
//! Typical call sequence: `Cli::parse` → [`commands::run`].

pub mod constants;
pub mod arg_utils;
pub mod env;
pub mod args;
pub mod commands;
pub mod bench;
