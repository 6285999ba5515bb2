//! E2E Test Suite 01: Block One-Shot API
//!
//! Exercises the standalone block functions through the crate root:
//! - compress_default / compress_fast
//! - compress_dest_size
//! - compress_bound
//! - decompress_safe / decompress_safe_partial / decompress_fast
//!
//! Each test drives a realistic payload through a full compress/decode cycle.

use lz4blk::{
    compress_bound, compress_dest_size, compress_fast, decompress_fast, decompress_safe_partial,
    lz4_compress_default as compress_default, lz4_decompress_safe, LZ4_ACCELERATION_DEFAULT,
    LZ4_ACCELERATION_MAX, LZ4_MAX_INPUT_SIZE,
};

fn roundtrip(original: &[u8], accel: i32) -> usize {
    let mut compressed = vec![0u8; compress_bound(original.len())];
    let size = compress_fast(original, &mut compressed, accel).expect("compression should succeed");
    let mut decompressed = vec![0u8; original.len()];
    let n = lz4_decompress_safe(&compressed[..size], &mut decompressed)
        .expect("decompression should succeed");
    assert_eq!(n, original.len());
    assert_eq!(decompressed, original);
    size
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: typical text shrinks
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_compress_default_roundtrip_typical_data() {
    let original = b"The quick brown fox jumps over the lazy dog. ".repeat(20);
    let mut compressed = vec![0u8; compress_bound(original.len())];
    let size = compress_default(&original, &mut compressed).expect("compression should succeed");
    assert!(size < original.len(), "compressed {size} should beat {}", original.len());

    let mut decompressed = vec![0u8; original.len()];
    assert_eq!(lz4_decompress_safe(&compressed[..size], &mut decompressed), Ok(original.len()));
    assert_eq!(decompressed, original);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: data without repeats stays within the bound
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_compress_default_roundtrip_incompressible_data() {
    let mut x = 0x9E37_79B9u32;
    let original: Vec<u8> = (0..50_000)
        .map(|_| {
            x = x.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (x >> 24) as u8
        })
        .collect();
    let size = roundtrip(&original, LZ4_ACCELERATION_DEFAULT);
    assert!(size <= compress_bound(original.len()));
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: compress_bound is always enough
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_compress_bound_returns_adequate_size() {
    for size in [0usize, 1, 10, 100, 1000, 10_000, 100_000] {
        let input = lz4blk::lorem::gen_buffer(size, size as u32);
        let bound = compress_bound(size);
        assert!(bound >= size + 16);
        let mut dst = vec![0u8; bound];
        let written = compress_default(&input, &mut dst).expect("bound-sized buffer must suffice");
        assert!(written <= bound);
    }
    assert_eq!(compress_bound(LZ4_MAX_INPUT_SIZE + 1), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: every acceleration level round-trips; higher levels are not smaller
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_compress_fast_acceleration_levels() {
    let original = lz4blk::lorem::gen_buffer(256 * 1024, 99);
    let slow = roundtrip(&original, 1);
    let fast = roundtrip(&original, 64);
    roundtrip(&original, LZ4_ACCELERATION_MAX);
    assert!(slow <= fast, "acceleration 1 gave {slow}, acceleration 64 gave {fast}");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: compress_dest_size fills a fixed budget
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_compress_dest_size_fills_budget() {
    let original = lz4blk::lorem::gen_buffer(64 * 1024, 5);
    let mut page = vec![0u8; 4096];
    let (consumed, written) = compress_dest_size(&original, &mut page).unwrap();
    assert!(written <= page.len());
    assert!(consumed > written, "text should compress: {consumed} into {written}");
    assert!(consumed < original.len());

    let mut decoded = vec![0u8; consumed];
    assert_eq!(lz4_decompress_safe(&page[..written], &mut decoded), Ok(consumed));
    assert_eq!(decoded, &original[..consumed]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 6: partial decoding reads only what is asked for
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_decompress_safe_partial_header_peek() {
    let original = lz4blk::lorem::gen_buffer(100_000, 6);
    let mut compressed = vec![0u8; compress_bound(original.len())];
    let size = compress_default(&original, &mut compressed).unwrap();

    let mut header = vec![0u8; 64];
    let n = decompress_safe_partial(&compressed[..size], &mut header, 64).unwrap();
    assert_eq!(n, 64);
    assert_eq!(&header[..26], b"Lorem ipsum dolor sit amet");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 7: fast decoding with a known original size
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_decompress_fast_known_size() {
    let original = lz4blk::lorem::gen_buffer(33_333, 7);
    let mut compressed = vec![0u8; compress_bound(original.len())];
    let size = compress_default(&original, &mut compressed).unwrap();

    let mut decoded = vec![0u8; original.len()];
    assert_eq!(decompress_fast(&compressed, &mut decoded), Ok(size));
    assert_eq!(decoded, original);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 8: empty and tiny inputs
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_and_tiny_inputs() {
    assert_eq!(roundtrip(b"", 1), 1);
    assert_eq!(roundtrip(b"x", 1), 2);
    assert_eq!(roundtrip(b"twelve bytes", 1), 13);
    roundtrip(b"thirteen byte", 1);
}
