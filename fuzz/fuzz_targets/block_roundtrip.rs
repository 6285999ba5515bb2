#![no_main]
use libfuzzer_sys::fuzz_target;

use lz4blk::block::{compress_block_to_vec, compress_dest_size, decompress_block_to_vec};

fuzz_target!(|data: &[u8]| {
    // The first byte picks the acceleration; the rest is the payload.
    let (accel, payload) = match data.split_first() {
        Some((&a, rest)) => (a as i32, rest),
        None => (1, data),
    };

    let compressed = compress_block_to_vec(payload, accel).expect("payload is far below the size limit");
    let recovered = decompress_block_to_vec(&compressed, payload.len())
        .expect("a freshly compressed block must decode");
    assert_eq!(recovered, payload, "block round-trip mismatch ({} compressed bytes)", compressed.len());

    // A budget of half the payload (at least one byte) must yield a decodable prefix.
    let mut dst = vec![0u8; (payload.len() / 2).max(1)];
    let (consumed, written) = compress_dest_size(payload, &mut dst).expect("dest-size compression");
    let prefix = decompress_block_to_vec(&dst[..written], consumed).expect("dest-size block must decode");
    assert_eq!(prefix, &payload[..consumed]);
});
