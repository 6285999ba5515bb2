//! Command-line definition.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::cli::arg_utils::parse_size;

#[derive(Parser, Debug)]
#[command(name = "lz4blk")]
#[command(version, about = "Raw LZ4 block compressor")]
#[command(long_about = "
Compresses a file into a single raw LZ4 block (no frame, no checksum) and back.
The original size is not stored: pass it to `decompress --size`.

Examples:
  lz4blk compress data.bin
  lz4blk compress data.bin --budget 4K -o head.lz4b
  lz4blk decompress data.bin.lz4b --size 1048576
  lz4blk bench -B 64K -T 4 data.bin
")]
pub struct Cli {
    /// Increase verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compress a file into one raw block
    #[command(alias = "c")]
    Compress {
        input: PathBuf,

        /// Output file (default: INPUT.lz4b)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Acceleration factor; higher is faster with a lower ratio
        #[arg(short, long)]
        acceleration: Option<i32>,

        /// Compress only as much input as fits in this many bytes
        #[arg(long, value_parser = parse_size)]
        budget: Option<usize>,
    },

    /// Decompress a raw block
    #[command(alias = "d")]
    Decompress {
        input: PathBuf,

        /// Output file (default: INPUT without .lz4b)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Decompressed size (exact with --fast, an upper bound otherwise)
        #[arg(short, long, value_parser = parse_size)]
        size: usize,

        /// Trust the input and decode exactly --size bytes
        #[arg(long, conflicts_with = "partial")]
        fast: bool,

        /// Stop after this many decoded bytes
        #[arg(long, value_parser = parse_size)]
        partial: Option<usize>,
    },

    /// Benchmark compression and decompression in memory
    #[command(alias = "b")]
    Bench {
        /// Input files (default: generated text)
        files: Vec<PathBuf>,

        /// Acceleration factor
        #[arg(short, long)]
        acceleration: Option<i32>,

        /// Independent block size
        #[arg(short = 'B', long, value_parser = parse_size)]
        block_size: Option<usize>,

        /// Worker threads (0 = one per CPU)
        #[arg(short = 'T', long)]
        threads: Option<usize>,

        /// Timed passes
        #[arg(short, long)]
        iterations: Option<u32>,
    },
}
