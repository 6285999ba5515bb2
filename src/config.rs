// config.rs — Defaults shared by the library-facing tool and the CLI.
//
// Every value here can be overridden: acceleration and worker count through
// the environment (see `cli::env`), everything through command-line flags.

use crate::block::types::MB;

// Default acceleration factor for `compress` and `bench`.
// Can be overridden by the LZ4BLK_ACCELERATION environment variable,
// or by the -a command-line flag.
pub const ACCELERATION_DEFAULT: i32 = 1;

// Environment variable names.
pub const ENV_ACCELERATION: &str = "LZ4BLK_ACCELERATION";
pub const ENV_NBWORKERS: &str = "LZ4BLK_NBWORKERS";

// Default number of benchmark worker threads; 0 = one per logical CPU.
// Can be overridden by the LZ4BLK_NBWORKERS environment variable,
// or by the -T command-line flag.
pub const NB_WORKERS_DEFAULT: usize = 0;

// Upper bound on worker threads selectable at runtime.
pub const NB_WORKERS_MAX: usize = 200;

// Size of each independent block the benchmark splits its input into.
// Can be overridden at runtime using the -B command-line flag.
pub const BENCH_BLOCK_SIZE_DEFAULT: usize = 4 * MB;

// Number of timed compress/decompress passes per benchmark run.
pub const BENCH_ITERATIONS_DEFAULT: u32 = 3;

// Bytes of generated text used when `bench` is given no input files.
pub const BENCH_SAMPLE_SIZE_DEFAULT: usize = 10 * MB;

// File extension appended by `compress` and stripped by `decompress`.
pub const LZ4BLK_EXTENSION: &str = ".lz4b";

/// Resolve a worker-count setting: `0` means one worker per logical CPU.
/// The result is always in `1..=NB_WORKERS_MAX`.
pub fn effective_workers(requested: usize) -> usize {
    let n = if requested == 0 { num_cpus::get() } else { requested };
    n.clamp(1, NB_WORKERS_MAX)
}
