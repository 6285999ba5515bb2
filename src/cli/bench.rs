//! In-memory benchmark: split the input into independent blocks, compress
//! and decompress them on a rayon pool, verify with XXH64, report speed.
//!
//! Blocks share nothing, so every worker uses its own transient table and the
//! result is identical to a sequential run.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use xxhash_rust::xxh64::xxh64;

use crate::block::{compress_bound, compress_fast, decompress_safe};
use crate::config::{
    effective_workers, ACCELERATION_DEFAULT, BENCH_BLOCK_SIZE_DEFAULT, BENCH_ITERATIONS_DEFAULT,
    BENCH_SAMPLE_SIZE_DEFAULT,
};
use crate::{display, displaylevel};

/// Runtime benchmark parameters.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub acceleration: i32,
    pub block_size: usize,
    /// 0 = one worker per logical CPU.
    pub workers: usize,
    pub iterations: u32,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            acceleration: ACCELERATION_DEFAULT,
            block_size: BENCH_BLOCK_SIZE_DEFAULT,
            workers: 0,
            iterations: BENCH_ITERATIONS_DEFAULT,
        }
    }
}

/// Result of one [`bench_mem`] run.
#[derive(Debug, Clone)]
pub struct BenchResult {
    pub src_size: usize,
    pub compressed_size: usize,
    pub nb_blocks: usize,
    /// `src_size / compressed_size`.
    pub ratio: f64,
    /// Best pass, in MB/s of uncompressed data.
    pub compress_speed_mb_s: f64,
    pub decompress_speed_mb_s: f64,
}

/// One independent block and its pre-allocated buffers.
struct BlockParam<'a> {
    src: &'a [u8],
    c_buf: Vec<u8>,
    c_size: usize,
    res_buf: Vec<u8>,
}

fn mb_per_s(bytes: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64().max(1e-9);
    bytes as f64 / secs / 1_000_000.0
}

/// Benchmark `src` in memory.
pub fn bench_mem(src: &[u8], display_name: &str, config: &BenchConfig) -> Result<BenchResult> {
    if config.block_size == 0 {
        bail!("block size must be positive");
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(effective_workers(config.workers))
        .build()
        .context("cannot start worker pool")?;

    let mut blocks: Vec<BlockParam<'_>> = src
        .chunks(config.block_size)
        .map(|chunk| BlockParam {
            src: chunk,
            c_buf: vec![0u8; compress_bound(chunk.len())],
            c_size: 0,
            res_buf: vec![0u8; chunk.len()],
        })
        .collect();
    let crc_orig = xxh64(src, 0);
    let acceleration = config.acceleration;

    let mut fastest_c = Duration::MAX;
    let mut fastest_d = Duration::MAX;
    for pass in 1..=config.iterations.max(1) {
        // ── compression ──────────────────────────────────────────────────────
        let start = Instant::now();
        pool.install(|| {
            blocks.par_iter_mut().try_for_each(|block| {
                block.c_size = compress_fast(block.src, &mut block.c_buf, acceleration)?;
                Ok::<_, crate::block::Lz4Error>(())
            })
        })
        .with_context(|| format!("{display_name}: compression failed"))?;
        fastest_c = fastest_c.min(start.elapsed());

        // ── decompression ────────────────────────────────────────────────────
        let start = Instant::now();
        pool.install(|| {
            blocks.par_iter_mut().try_for_each(|block| {
                let n = decompress_safe(&block.c_buf[..block.c_size], &mut block.res_buf)?;
                if n != block.src.len() {
                    return Err(crate::block::DecompressError::CorruptInput { consumed: block.c_size });
                }
                Ok(())
            })
        })
        .with_context(|| format!("{display_name}: decompression failed"))?;
        fastest_d = fastest_d.min(start.elapsed());

        let c_size: usize = blocks.iter().map(|b| b.c_size).sum();
        displaylevel!(
            3,
            "{:>2}#{:<17.17} :{:>10} ->{:>10} ({:5.3}),{:8.1} MB/s ,{:8.1} MB/s\n",
            pass,
            display_name,
            src.len(),
            c_size,
            src.len() as f64 / c_size.max(1) as f64,
            mb_per_s(src.len(), fastest_c),
            mb_per_s(src.len(), fastest_d)
        );
    }

    // ── verification ─────────────────────────────────────────────────────────
    let mut restored = Vec::with_capacity(src.len());
    for block in &blocks {
        restored.extend_from_slice(&block.res_buf);
    }
    let crc_check = xxh64(&restored, 0);
    if crc_check != crc_orig {
        let first_diff = src.iter().zip(&restored).position(|(a, b)| a != b).unwrap_or(0);
        bail!(
            "{display_name}: checksum mismatch ({crc_orig:016X} != {crc_check:016X}), first difference at byte {first_diff}"
        );
    }

    let compressed_size: usize = blocks.iter().map(|b| b.c_size).sum();
    Ok(BenchResult {
        src_size: src.len(),
        compressed_size,
        nb_blocks: blocks.len(),
        ratio: src.len() as f64 / compressed_size.max(1) as f64,
        compress_speed_mb_s: mb_per_s(src.len(), fastest_c),
        decompress_speed_mb_s: mb_per_s(src.len(), fastest_d),
    })
}

fn report(name: &str, r: &BenchResult) {
    displaylevel!(
        2,
        "{:<17.17} :{:>10} ->{:>10} ({:5.3}),{:8.1} MB/s ,{:8.1} MB/s  [{} blocks]\n",
        name,
        r.src_size,
        r.compressed_size,
        r.ratio,
        r.compress_speed_mb_s,
        r.decompress_speed_mb_s,
        r.nb_blocks
    );
}

/// Benchmark each file in `files`, or generated text when `files` is empty.
pub fn bench_files(files: &[PathBuf], config: &BenchConfig) -> Result<Vec<BenchResult>> {
    displaylevel!(
        3,
        "Benchmarking with acceleration {}, {} KiB blocks, {} workers\n",
        config.acceleration,
        config.block_size >> 10,
        effective_workers(config.workers)
    );

    if files.is_empty() {
        let sample = crate::lorem::gen_buffer(BENCH_SAMPLE_SIZE_DEFAULT, 0);
        let result = bench_mem(&sample, "Lorem ipsum", config)?;
        report("Lorem ipsum", &result);
        return Ok(vec![result]);
    }

    let mut results = Vec::with_capacity(files.len());
    for path in files {
        let data = read_input(path)?;
        let name = display_name(path);
        let result = bench_mem(&data, &name, config)?;
        report(&name, &result);
        results.push(result);
    }
    if results.len() > 1 {
        let src: usize = results.iter().map(|r| r.src_size).sum();
        let dst: usize = results.iter().map(|r| r.compressed_size).sum();
        display!("{} files : {} -> {} ({:5.3})\n", results.len(), src, dst, src as f64 / dst.max(1) as f64);
    }
    Ok(results)
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
