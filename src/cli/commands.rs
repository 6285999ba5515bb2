//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};

use crate::block::{
    compress_bound, compress_dest_size, compress_fast, decompress_fast, decompress_safe,
    decompress_safe_partial,
};
use crate::cli::arg_utils::{compressed_name, decompressed_name};
use crate::cli::args::{Cli, Command};
use crate::cli::bench::{bench_files, BenchConfig};
use crate::cli::constants::{adjust_display_level, welcome_message};
use crate::cli::env::{init_acceleration, init_nb_workers};
use crate::config::{BENCH_BLOCK_SIZE_DEFAULT, BENCH_ITERATIONS_DEFAULT, LZ4BLK_EXTENSION};
use crate::displaylevel;

/// Run the parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    adjust_display_level(cli.verbose, cli.quiet);
    displaylevel!(3, "{}", welcome_message());

    match cli.command {
        Command::Compress { input, output, acceleration, budget } => {
            let output = match output {
                Some(path) => path,
                None => default_compressed(&input)?,
            };
            let acceleration = acceleration.unwrap_or_else(init_acceleration);
            compress_file(&input, &output, acceleration, budget)
        }
        Command::Decompress { input, output, size, fast, partial } => {
            let output = match output {
                Some(path) => path,
                None => default_decompressed(&input)?,
            };
            let mode = match (fast, partial) {
                (true, _) => DecodeMode::Fast,
                (false, Some(target)) => DecodeMode::Partial(target),
                (false, None) => DecodeMode::Safe,
            };
            decompress_file(&input, &output, size, mode)
        }
        Command::Bench { files, acceleration, block_size, threads, iterations } => {
            let config = BenchConfig {
                acceleration: acceleration.unwrap_or_else(init_acceleration),
                block_size: block_size.unwrap_or(BENCH_BLOCK_SIZE_DEFAULT),
                workers: threads.unwrap_or_else(init_nb_workers),
                iterations: iterations.unwrap_or(BENCH_ITERATIONS_DEFAULT),
            };
            bench_files(&files, &config).map(|_| ())
        }
    }
}

fn default_compressed(input: &Path) -> Result<PathBuf> {
    let name = input.to_str().ok_or_else(|| anyhow!("non UTF-8 path {}", input.display()))?;
    Ok(PathBuf::from(compressed_name(name, LZ4BLK_EXTENSION)))
}

fn default_decompressed(input: &Path) -> Result<PathBuf> {
    let name = input.to_str().ok_or_else(|| anyhow!("non UTF-8 path {}", input.display()))?;
    match decompressed_name(name, LZ4BLK_EXTENSION) {
        Some(stem) => Ok(PathBuf::from(stem)),
        None => bail!(
            "cannot infer an output name for {}: it does not end with {} (use -o)",
            input.display(),
            LZ4BLK_EXTENSION
        ),
    }
}

/// Compress `input` into one block written to `output`.
pub fn compress_file(
    input: &Path,
    output: &Path,
    acceleration: i32,
    budget: Option<usize>,
) -> Result<()> {
    let src = std::fs::read(input).with_context(|| format!("cannot read {}", input.display()))?;

    let (consumed, block) = match budget {
        Some(budget) => {
            let mut dst = vec![0u8; budget];
            let (consumed, written) = compress_dest_size(&src, &mut dst)
                .with_context(|| format!("cannot compress {}", input.display()))?;
            dst.truncate(written);
            (consumed, dst)
        }
        None => {
            let mut dst = vec![0u8; compress_bound(src.len())];
            let written = compress_fast(&src, &mut dst, acceleration)
                .with_context(|| format!("cannot compress {}", input.display()))?;
            dst.truncate(written);
            (src.len(), dst)
        }
    };

    std::fs::write(output, &block).with_context(|| format!("cannot write {}", output.display()))?;

    if consumed < src.len() {
        displaylevel!(
            2,
            "Compressed {} of {} bytes into {} bytes ({})\n",
            consumed,
            src.len(),
            block.len(),
            output.display()
        );
    } else {
        displaylevel!(
            2,
            "Compressed {} bytes into {} bytes, {:.2}% ({})\n",
            src.len(),
            block.len(),
            block.len() as f64 * 100.0 / src.len().max(1) as f64,
            output.display()
        );
    }
    Ok(())
}

/// How `decompress` decodes the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// `size` bounds the output.
    Safe,
    /// `size` is the exact original size.
    Fast,
    /// Stop after this many bytes.
    Partial(usize),
}

/// Decompress the block in `input` and write the result to `output`.
pub fn decompress_file(input: &Path, output: &Path, size: usize, mode: DecodeMode) -> Result<()> {
    let src = std::fs::read(input).with_context(|| format!("cannot read {}", input.display()))?;
    let mut dst = vec![0u8; size];

    let written = match mode {
        DecodeMode::Safe => decompress_safe(&src, &mut dst),
        DecodeMode::Fast => decompress_fast(&src, &mut dst).map(|_| size),
        DecodeMode::Partial(target) => decompress_safe_partial(&src, &mut dst, target),
    }
    .with_context(|| format!("{} is not a valid block for size {}", input.display(), size))?;
    dst.truncate(written);

    std::fs::write(output, &dst).with_context(|| format!("cannot write {}", output.display()))?;
    displaylevel!(2, "Decoded {} bytes ({})\n", written, output.display());
    Ok(())
}
