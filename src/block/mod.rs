//! Block compression and decompression.
//!
//! The block format is self-contained: a sequence of tokens, each a literal
//! run optionally followed by a back-reference, with no header or checksum.
//! Framing, checksums and sizes are the caller's business.

pub mod compress;
pub mod decompress_api;
pub mod decompress_core;
pub mod stream;
pub mod table;
pub mod types;

pub use compress::{
    compress_block_to_vec, compress_bound, compress_default, compress_dest_size, compress_fast,
    compress_fast_ext_state, Lz4Error, LZ4_ACCELERATION_DEFAULT, LZ4_ACCELERATION_MAX,
    LZ4_MAX_INPUT_SIZE,
};
pub use decompress_api::{
    decoder_ring_buffer_size, decompress_block_to_vec, decompress_fast,
    decompress_fast_using_dict, decompress_safe, decompress_safe_partial,
    decompress_safe_partial_using_dict, decompress_safe_using_dict, decompress_safe_with_prefix,
    Lz4StreamDecode,
};
pub use decompress_core::DecompressError;
pub use stream::Lz4Stream;
pub use types::{LZ4_DISTANCE_MAX, WINDOW_SIZE};
