//! E2E Test Suite 03: Error Handling & Edge Cases
//!
//! Checks that every failure surfaces as a typed error value rather than a
//! panic or out-of-bounds access.
//!
//! Coverage:
//! - Compression errors (output too small, empty destination)
//! - Corrupt, truncated and hostile compressed blocks
//! - Error position reporting via `DecompressError::sentinel`
//! - Streaming context poisoning and recovery
//! - Partial decompression edge cases

use lz4blk::block::{decompress_fast_using_dict, decompress_safe_using_dict};
use lz4blk::{
    compress_bound, compress_fast, decompress_fast, decompress_safe_partial,
    lz4_compress_default as compress_default, lz4_decompress_safe as decompress_safe,
    DecompressError, Lz4Error, Lz4Stream, Lz4StreamDecode, LZ4_MAX_INPUT_SIZE,
};

fn compressed(src: &[u8]) -> Vec<u8> {
    lz4blk::compress(src).expect("compression should succeed")
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 1: destination too small on decode
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_decompress_dst_too_small() {
    let original = b"Hello, World! This is a test string for LZ4 compression.".repeat(10);
    let block = compressed(&original);
    let mut dst = vec![0u8; original.len() / 2];
    let err = decompress_safe(&block, &mut dst).unwrap_err();
    assert!(matches!(err, DecompressError::CorruptInput { .. }));
    assert!(err.sentinel() < 0);
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 2: hostile input
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_decompress_corrupt_data() {
    let garbage: [&[u8]; 6] = [
        &[0xFF; 32],
        &[0x0F, 0x00, 0x00],
        &[0x1F, b'a', 0x00, 0x00, 0xFF, 0xFF],
        &[0xF0, 0xFF, 0xFF, 0xFF],
        &[0x44, 1, 2, 3, 4, 0xFF, 0x7F],
        &[0x00, 0x00, 0x00],
    ];
    let mut dst = vec![0u8; 1024];
    for (i, block) in garbage.iter().enumerate() {
        assert!(decompress_safe(block, &mut dst).is_err(), "case {i} should fail");
    }
}

#[test]
fn test_decompress_empty_input() {
    let mut dst = vec![0u8; 100];
    assert_eq!(
        decompress_safe(&[], &mut dst),
        Err(DecompressError::CorruptInput { consumed: 0 })
    );
}

#[test]
fn test_sentinel_reports_failure_position() {
    // Literal "x", then an offset of 5 with only one byte of output behind it.
    let block = [0x10, b'x', 0x05, 0x00, 0x50, b'y', b'y', b'y', b'y', b'y'];
    let mut dst = vec![0u8; 64];
    let err = decompress_safe(&block, &mut dst).unwrap_err();
    assert_eq!(err.consumed(), 4);
    assert_eq!(err.sentinel(), -5);
    assert!(err.to_string().contains('4'));
}

#[test]
fn test_truncated_blocks_never_panic() {
    let original = lz4blk::lorem::gen_buffer(20_000, 1);
    let block = compressed(&original);
    let mut dst = vec![0u8; original.len()];
    for cut in (0..block.len()).step_by(7) {
        let _ = decompress_safe(&block[..cut], &mut dst);
        let _ = decompress_fast(&block[..cut], &mut dst);
        let _ = decompress_safe_partial(&block[..cut], &mut dst, 10_000);
    }
}

#[test]
fn test_wrong_dictionary_never_panics() {
    let dict = lz4blk::lorem::gen_buffer(10_000, 2);
    let src = lz4blk::lorem::gen_buffer(10_000, 3);
    let mut stream = Lz4Stream::new();
    stream.load_dict(&dict);
    let mut block = vec![0u8; compress_bound(src.len())];
    let n = stream.compress_continue(&src, &mut block, 1).unwrap();

    let short_dict = &dict[..16];
    let mut dst = vec![0u8; src.len()];
    let _ = decompress_safe_using_dict(&block[..n], &mut dst, short_dict);
    let _ = decompress_fast_using_dict(&block[..n], &mut dst, short_dict);
    assert_eq!(decompress_safe_using_dict(&block[..n], &mut dst, &dict), Ok(src.len()));
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 3: compression into undersized destinations
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_compress_dst_empty() {
    let mut dst: Vec<u8> = vec![];
    assert_eq!(compress_default(b"Some data to compress", &mut dst), Err(Lz4Error::OutputTooSmall));
    assert_eq!(compress_default(b"short", &mut dst), Err(Lz4Error::OutputTooSmall));
}

#[test]
fn test_compress_dst_too_small() {
    let src = b"This is a longer message that needs more space when compressed with metadata";
    let mut dst = vec![0u8; 5];
    assert_eq!(compress_default(src, &mut dst), Err(Lz4Error::OutputTooSmall));
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 4: out-of-range acceleration is clamped, not rejected
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_compress_fast_unusual_acceleration() {
    let src = b"Test data for compression, test data for compression";
    for accel in [0, -1, i32::MIN, i32::MAX] {
        let mut dst = vec![0u8; compress_bound(src.len())];
        let n = compress_fast(src, &mut dst, accel).unwrap();
        let mut out = vec![0u8; src.len()];
        assert_eq!(decompress_safe(&dst[..n], &mut out), Ok(src.len()), "accel {accel}");
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 5: input size limit
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_max_input_size() {
    assert_eq!(LZ4_MAX_INPUT_SIZE, 2_113_929_216);
    assert_eq!(compress_bound(LZ4_MAX_INPUT_SIZE + 1), 0);
    assert!(compress_bound(LZ4_MAX_INPUT_SIZE) > LZ4_MAX_INPUT_SIZE);
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 6: partial decompression edge cases
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_decompress_partial_target_exceeds_dst() {
    let original = lz4blk::lorem::gen_buffer(2_000, 4);
    let block = compressed(&original);
    let mut dst = vec![0u8; 100];
    assert_eq!(decompress_safe_partial(&block, &mut dst, 5_000), Ok(100));
    assert_eq!(dst, &original[..100]);
}

#[test]
fn test_decompress_partial_zero_target() {
    let block = compressed(b"anything at all, anything at all");
    let mut dst = vec![0u8; 64];
    assert_eq!(decompress_safe_partial(&block, &mut dst, 0), Ok(0));
}

#[test]
fn test_decompress_partial_target_larger_than_original() {
    let original = b"partial decoding past the end of the block".to_vec();
    let block = compressed(&original);
    let mut dst = vec![0u8; 1_000];
    assert_eq!(decompress_safe_partial(&block, &mut dst, 1_000), Ok(original.len()));
    assert_eq!(&dst[..original.len()], &original[..]);
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 7: streaming contexts after failures
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_poisoned_stream_requires_reset() {
    let src = lz4blk::lorem::gen_buffer(10_000, 5);
    let mut stream = Lz4Stream::new();
    let mut tiny = vec![0u8; 32];
    assert_eq!(stream.compress_continue(&src, &mut tiny, 1), Err(Lz4Error::OutputTooSmall));

    let mut dst = vec![0u8; compress_bound(src.len())];
    assert_eq!(stream.compress_continue(&src, &mut dst, 1), Err(Lz4Error::UninitializedContext));

    stream.reset();
    let n = stream.compress_continue(&src, &mut dst, 1).unwrap();
    let mut out = vec![0u8; src.len()];
    assert_eq!(decompress_safe(&dst[..n], &mut out), Ok(src.len()));
}

#[test]
fn test_stream_decode_survives_bad_block() {
    let a = lz4blk::lorem::gen_buffer(8_000, 6);
    let b = lz4blk::lorem::gen_buffer(8_000, 7);
    let mut enc = Lz4Stream::new();
    let mut dec = Lz4StreamDecode::new();

    let mut blocks = Vec::new();
    for chunk in [&a, &b] {
        let mut block = vec![0u8; compress_bound(chunk.len())];
        let n = enc.compress_continue(chunk, &mut block, 1).unwrap();
        block.truncate(n);
        blocks.push(block);
    }

    let mut out = vec![0u8; a.len()];
    assert_eq!(dec.decompress_continue(&blocks[0], &mut out), Ok(a.len()));

    // A truncated copy of the second block fails; the intact one still decodes.
    let mut out2 = vec![0u8; b.len()];
    let cut = &blocks[1][..blocks[1].len() - 3];
    assert!(dec.decompress_continue(cut, &mut out2).is_err());
    assert_eq!(dec.decompress_continue(&blocks[1], &mut out2), Ok(b.len()));
    assert_eq!(out2, b);
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 8: boundary inputs
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_roundtrip_single_byte() {
    let block = compressed(b"Z");
    assert_eq!(block, [0x10, b'Z']);
    let mut out = [0u8; 1];
    assert_eq!(decompress_safe(&block, &mut out), Ok(1));
    assert_eq!(&out, b"Z");
}

#[test]
fn test_compress_large_repeated_data() {
    let original = vec![0xABu8; 4 * 1024 * 1024];
    let block = compressed(&original);
    assert!(block.len() < original.len() / 200);
    let mut out = vec![0u8; original.len()];
    assert_eq!(decompress_safe(&block, &mut out), Ok(original.len()));
    assert!(out.iter().all(|&b| b == 0xAB));
}
