// lz4blk — LZ4 block codec with streaming contexts and a small command-line tool

pub mod block;
pub mod cli;
pub mod config;
pub mod lorem;

// ── Version constants ────────────────────────────────────────────────────────
pub const LZ4BLK_VERSION_MAJOR: u32 = 1;
pub const LZ4BLK_VERSION_MINOR: u32 = 7;
pub const LZ4BLK_VERSION_RELEASE: u32 = 1;
pub const LZ4BLK_VERSION_NUMBER: u32 =
    LZ4BLK_VERSION_MAJOR * 100 * 100 + LZ4BLK_VERSION_MINOR * 100 + LZ4BLK_VERSION_RELEASE;
pub const LZ4BLK_VERSION_STRING: &str = "1.7.1";

/// Block format version implemented by this crate.
pub fn version_number() -> u32 {
    LZ4BLK_VERSION_NUMBER
}

pub fn version_string() -> &'static str {
    LZ4BLK_VERSION_STRING
}

// ── Distance constant ────────────────────────────────────────────────────────
pub use block::types::LZ4_DISTANCE_MAX;

/// Size in bytes of a streaming compression context's position table.
pub fn size_of_state() -> usize {
    block::types::LZ4_HASH_SIZE_U32 * core::mem::size_of::<u32>()
}

// ── Convenience one-shot API ─────────────────────────────────────────────────

/// Compress `src` into a new, exactly sized buffer using the default
/// acceleration.
pub fn compress(src: &[u8]) -> Result<Vec<u8>, block::Lz4Error> {
    block::compress_block_to_vec(src, block::LZ4_ACCELERATION_DEFAULT)
}

/// Decompress a block whose original size is at most `max_size`.
pub fn decompress(src: &[u8], max_size: usize) -> Result<Vec<u8>, block::DecompressError> {
    block::decompress_block_to_vec(src, max_size)
}

// ── Top-level re-exports ─────────────────────────────────────────────────────
pub use block::compress::compress_default as lz4_compress_default;
pub use block::decompress_api::decompress_safe as lz4_decompress_safe;
pub use block::{
    compress_bound, compress_dest_size, compress_fast, decompress_fast, decompress_safe_partial,
    DecompressError, Lz4Error, Lz4Stream, Lz4StreamDecode, LZ4_ACCELERATION_DEFAULT,
    LZ4_ACCELERATION_MAX, LZ4_MAX_INPUT_SIZE,
};
