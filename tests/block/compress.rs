// Integration tests for block compression (block/compress.rs)
//
//   - compress_bound() worst-case sizes and the oversized-input sentinel
//   - compress_default() / compress_fast() produce decodable, deterministic blocks
//   - inputs below 13 bytes become a single literal run
//   - compress_dest_size() never exceeds its budget and decodes to a prefix
//   - error paths: OutputTooSmall, InputTooLarge
//   - compress_fast_ext_state() reuses a stream context's table

use lz4blk::block::compress::{
    compress_block_to_vec, compress_bound, compress_default, compress_dest_size, compress_fast,
    compress_fast_ext_state, Lz4Error, LZ4_ACCELERATION_DEFAULT, LZ4_ACCELERATION_MAX,
    LZ4_MAX_INPUT_SIZE,
};
use lz4blk::block::decompress_api::decompress_safe;
use lz4blk::block::stream::Lz4Stream;

/// Allocate a worst-case destination buffer for `src_len` bytes.
fn make_dst(src_len: usize) -> Vec<u8> {
    vec![0u8; compress_bound(src_len)]
}

fn round_trip(src: &[u8], block: &[u8]) {
    let mut out = vec![0u8; src.len()];
    let n = decompress_safe(block, &mut out).expect("block must decode");
    assert_eq!(n, src.len());
    assert_eq!(&out[..], src);
}

/// Deterministic pseudo-random bytes.
fn noise(len: usize, seed: u32) -> Vec<u8> {
    let mut x = seed.wrapping_mul(2_654_435_761) | 1;
    (0..len)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            (x >> 24) as u8
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn constant_values() {
    assert_eq!(LZ4_MAX_INPUT_SIZE, 0x7E00_0000);
    assert_eq!(LZ4_ACCELERATION_DEFAULT, 1);
    assert_eq!(LZ4_ACCELERATION_MAX, 65_537);
}

#[test]
fn lz4_error_display_is_informative() {
    assert!(Lz4Error::OutputTooSmall.to_string().contains("too small"));
    assert!(Lz4Error::InputTooLarge.to_string().contains("maximum"));
    assert_ne!(Lz4Error::OutputTooSmall, Lz4Error::InputTooLarge);
}

// ─────────────────────────────────────────────────────────────────────────────
// compress_bound
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn compress_bound_formula() {
    assert_eq!(compress_bound(0), 16);
    assert_eq!(compress_bound(1), 17);
    assert_eq!(compress_bound(255), 272);
    assert_eq!(compress_bound(1000), 1019);
}

#[test]
fn compress_bound_exceeds_max_returns_zero() {
    assert_eq!(compress_bound(LZ4_MAX_INPUT_SIZE + 1), 0);
    assert!(compress_bound(LZ4_MAX_INPUT_SIZE) > LZ4_MAX_INPUT_SIZE);
}

// ─────────────────────────────────────────────────────────────────────────────
// Concrete scenarios
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_input_is_single_zero_token() {
    let mut dst = make_dst(0);
    let n = compress_default(b"", &mut dst).unwrap();
    assert_eq!(&dst[..n], &[0x00]);

    let mut out = [0u8; 0];
    assert_eq!(decompress_safe(&dst[..n], &mut out), Ok(0));
}

#[test]
fn twenty_identical_bytes_shrink() {
    let src = [b'a'; 20];
    let mut dst = make_dst(src.len());
    let n = compress_default(&src, &mut dst).unwrap();
    assert!(n < 20, "20 x 'a' should compress, got {n} bytes");
    // literal 'a', offset 1 match of 14, five trailing literals
    assert_eq!(&dst[..n], &[0x1A, b'a', 0x01, 0x00, 0x50, b'a', b'a', b'a', b'a', b'a']);
    round_trip(&src, &dst[..n]);
}

#[test]
fn one_mebibyte_of_noise_stays_within_bound() {
    let src = noise(1 << 20, 7);
    let mut dst = make_dst(src.len());
    let n = compress_default(&src, &mut dst).unwrap();
    assert!(n <= compress_bound(src.len()));
    round_trip(&src, &dst[..n]);
}

#[test]
fn short_inputs_are_one_literal_run() {
    for len in 1..13usize {
        let src: Vec<u8> = (0..len as u8).collect();
        let mut dst = make_dst(len);
        let n = compress_default(&src, &mut dst).unwrap();
        assert_eq!(n, len + 1, "len {len}");
        assert_eq!(dst[0], (len as u8) << 4);
        assert_eq!(&dst[1..n], &src[..]);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// compress_fast
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn compress_fast_acceleration_1_matches_compress_default() {
    let src = b"The quick brown fox jumps over the lazy dog. ".repeat(50);
    let mut dst1 = make_dst(src.len());
    let mut dst2 = make_dst(src.len());
    let r1 = compress_default(&src, &mut dst1).unwrap();
    let r2 = compress_fast(&src, &mut dst2, 1).unwrap();
    assert_eq!(dst1[..r1], dst2[..r2]);
}

#[test]
fn compress_fast_clamps_acceleration() {
    let src = b"abcabcabcabcabcabcabcabcabcabcabcabc".repeat(30);
    let mut a = make_dst(src.len());
    let mut b = make_dst(src.len());
    // Non-positive values behave like 1, huge values like the maximum.
    let na = compress_fast(&src, &mut a, 0).unwrap();
    let nb = compress_fast(&src, &mut b, -5).unwrap();
    assert_eq!(a[..na], b[..nb]);

    let nc = compress_fast(&src, &mut a, i32::MAX).unwrap();
    let nd = compress_fast(&src, &mut b, LZ4_ACCELERATION_MAX).unwrap();
    assert_eq!(a[..nc], b[..nd]);
    round_trip(&src, &a[..nc]);
}

#[test]
fn compress_fast_round_trips_every_acceleration() {
    let src = lz4blk::lorem::gen_buffer(200_000, 11);
    for acceleration in [1, 2, 4, 8, 17, 100, 1000, 65_537] {
        let block = compress_block_to_vec(&src, acceleration).unwrap();
        round_trip(&src, &block);
    }
}

#[test]
fn compress_is_deterministic() {
    let src = lz4blk::lorem::gen_buffer(150_000, 5);
    let a = compress_block_to_vec(&src, 3).unwrap();
    let b = compress_block_to_vec(&src, 3).unwrap();
    assert_eq!(a, b);
}

#[test]
fn compress_handles_long_runs_and_lengths() {
    // Literal and match lengths well past 255 need continuation bytes.
    let mut src = noise(1000, 3);
    src.extend(std::iter::repeat(0x55).take(70_000));
    src.extend(noise(600, 4));
    let block = compress_block_to_vec(&src, 1).unwrap();
    round_trip(&src, &block);
}

#[test]
fn compress_fast_output_too_small() {
    let src = noise(4096, 1);
    let mut dst = vec![0u8; 100];
    assert_eq!(compress_fast(&src, &mut dst, 1), Err(Lz4Error::OutputTooSmall));
}

#[test]
fn compress_fast_tight_destination_succeeds() {
    // A destination exactly as large as the compressed result is enough.
    let src = b"limited output path, limited output path, limited output path".repeat(40);
    let full = compress_block_to_vec(&src, 1).unwrap();
    let mut dst = vec![0u8; full.len()];
    let n = compress_fast(&src, &mut dst, 1).unwrap();
    assert_eq!(dst[..n], full[..]);
}

// ─────────────────────────────────────────────────────────────────────────────
// compress_dest_size
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn compress_dest_size_zero_budget() {
    let mut dst: [u8; 0] = [];
    assert_eq!(compress_dest_size(b"some input bytes", &mut dst), Ok((0, 0)));
}

#[test]
fn compress_dest_size_full_budget_consumes_everything() {
    let src = lz4blk::lorem::gen_buffer(5000, 2);
    let mut dst = make_dst(src.len());
    let (consumed, written) = compress_dest_size(&src, &mut dst).unwrap();
    assert_eq!(consumed, src.len());
    round_trip(&src, &dst[..written]);
}

#[test]
fn compress_dest_size_prefix_property() {
    let inputs = [lz4blk::lorem::gen_buffer(40_000, 9), noise(40_000, 9)];
    for src in &inputs {
        for budget in [1usize, 2, 10, 17, 100, 513, 1000, 4096, 12_345, 30_000] {
            let mut dst = vec![0u8; budget];
            let (consumed, written) = compress_dest_size(src, &mut dst).unwrap();
            assert!(written <= budget, "budget {budget}: wrote {written}");
            assert!(consumed <= src.len());

            let mut out = vec![0u8; consumed];
            let n = decompress_safe(&dst[..written], &mut out).unwrap();
            assert_eq!(n, consumed, "budget {budget}");
            assert_eq!(&out[..], &src[..consumed], "budget {budget}");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// compress_fast_ext_state
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn ext_state_round_trips_and_resets() {
    let mut state = Lz4Stream::new();
    state.load_dict(&[7u8; 4096]);
    let src = lz4blk::lorem::gen_buffer(20_000, 1);
    let mut dst = make_dst(src.len());
    let n = compress_fast_ext_state(&mut state, &src, &mut dst, 1).unwrap();
    // The dictionary was discarded: the block decodes without one.
    round_trip(&src, &dst[..n]);
    assert_eq!(state.dict_size(), 0);
}

#[cfg(target_pointer_width = "64")]
#[test]
fn ext_state_matches_one_shot_for_large_inputs() {
    let src = lz4blk::lorem::gen_buffer(100_000, 8);
    let mut state = Lz4Stream::new();
    let mut a = make_dst(src.len());
    let mut b = make_dst(src.len());
    let na = compress_fast_ext_state(&mut state, &src, &mut a, 2).unwrap();
    let nb = compress_fast(&src, &mut b, 2).unwrap();
    assert_eq!(a[..na], b[..nb]);
}

// ─────────────────────────────────────────────────────────────────────────────
// InputTooLarge
// ─────────────────────────────────────────────────────────────────────────────

/// The zeroed buffer is never touched: every entry point rejects it before
/// scanning, so the pages stay unmapped.
#[cfg(target_pointer_width = "64")]
#[test]
fn oversized_input_is_rejected_everywhere() {
    let src = vec![0u8; LZ4_MAX_INPUT_SIZE + 1];
    let mut dst = vec![0u8; 64];

    assert_eq!(compress_fast(&src, &mut dst, 1), Err(Lz4Error::InputTooLarge));
    assert_eq!(compress_dest_size(&src, &mut dst), Err(Lz4Error::InputTooLarge));

    let mut state = Lz4Stream::new();
    assert_eq!(
        compress_fast_ext_state(&mut state, &src, &mut dst, 1),
        Err(Lz4Error::InputTooLarge)
    );

    let mut stream = Lz4Stream::new();
    assert_eq!(stream.compress_continue(&src, &mut dst, 1), Err(Lz4Error::InputTooLarge));
    assert_eq!(
        stream.compress_continue_prefix(&src, 0, &mut dst, 1),
        Err(Lz4Error::InputTooLarge)
    );
    // Rejected before any bookkeeping, so the context is still usable.
    assert!(stream.is_initialized());
    let mut out = make_dst(5);
    assert_eq!(stream.compress_continue(b"hello", &mut out, 1), Ok(6));
}
