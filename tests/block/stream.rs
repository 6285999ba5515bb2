// Integration tests for streaming compression (block/stream.rs)
//
//   - a fresh or reset context compresses like the one-shot API
//   - chained blocks in separate buffers and in one contiguous buffer
//   - load_dict() retains the last 64 KiB and blocks decode with that tail
//   - save_dict() moves history into caller memory and continues in place
//   - a failed step poisons the context until reset()
//   - an out-of-range prefix start is rejected without touching the context

use lz4blk::block::compress::{compress_block_to_vec, compress_bound, Lz4Error};
use lz4blk::block::decompress_api::{
    decompress_safe, decompress_safe_using_dict, decompress_safe_with_prefix, Lz4StreamDecode,
};
use lz4blk::block::stream::Lz4Stream;
use lz4blk::block::types::KB;

fn make_dst(src_len: usize) -> Vec<u8> {
    vec![0u8; compress_bound(src_len)]
}

fn compress_chunk(stream: &mut Lz4Stream, chunk: &[u8]) -> Vec<u8> {
    let mut dst = make_dst(chunk.len());
    let n = stream.compress_continue(chunk, &mut dst, 1).unwrap();
    dst.truncate(n);
    dst
}

/// 4 KiB of a short repeating pattern.
fn pattern_chunk() -> Vec<u8> {
    b"0123456789abcdefghijklmnopqrstuvwxyz-=".iter().copied().cycle().take(4 * KB).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Construction
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn fresh_stream_matches_one_shot() {
    // Past 64 KiB the one-shot path uses the same table width as a stream.
    let src = lz4blk::lorem::gen_buffer(100_000, 1);
    let mut stream = Lz4Stream::new();
    assert!(stream.is_initialized());
    assert_eq!(stream.dict_size(), 0);
    let block = compress_chunk(&mut stream, &src);
    assert_eq!(block, compress_block_to_vec(&src, 1).unwrap());
}

#[test]
fn default_equals_new() {
    let src = b"default and new must agree, default and new must agree".repeat(4);
    let a = compress_chunk(&mut Lz4Stream::default(), &src);
    let b = compress_chunk(&mut Lz4Stream::new(), &src);
    assert_eq!(a, b);
}

#[test]
fn reset_forgets_history() {
    let first = lz4blk::lorem::gen_buffer(10_000, 2);
    let second = lz4blk::lorem::gen_buffer(10_000, 3);

    let mut reused = Lz4Stream::new();
    compress_chunk(&mut reused, &first);
    assert!(reused.dict_size() > 0);
    reused.reset();
    assert_eq!(reused.dict_size(), 0);

    let block = compress_chunk(&mut reused, &second);
    assert_eq!(block, compress_chunk(&mut Lz4Stream::new(), &second));
    let mut out = vec![0u8; second.len()];
    assert_eq!(decompress_safe(&block, &mut out), Ok(second.len()));
}

// ─────────────────────────────────────────────────────────────────────────────
// Chained blocks
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn separate_buffers_reference_previous_block() {
    let chunk = pattern_chunk();
    let mut stream = Lz4Stream::new();
    let b1 = compress_chunk(&mut stream, &chunk);
    let copy = chunk.clone();
    let b2 = compress_chunk(&mut stream, &copy);

    // The second block is mostly one long match into the first.
    assert!(b2.len() < b1.len());
    assert!(b2.len() < 32, "second block is {} bytes", b2.len());

    let mut dec = Lz4StreamDecode::new();
    let mut out1 = vec![0u8; chunk.len()];
    let mut out2 = vec![0u8; chunk.len()];
    assert_eq!(dec.decompress_continue(&b1, &mut out1), Ok(chunk.len()));
    assert_eq!(dec.decompress_continue(&b2, &mut out2), Ok(chunk.len()));
    assert_eq!(out1, chunk);
    assert_eq!(out2, chunk);

    // On its own the second block needs the first as history.
    let mut alone = vec![0u8; chunk.len()];
    assert!(decompress_safe(&b2, &mut alone).is_err());
    assert_eq!(decompress_safe_using_dict(&b2, &mut alone, &chunk), Ok(chunk.len()));
}

#[test]
fn contiguous_buffer_uses_prefix() {
    let chunk = pattern_chunk();
    let mut buffer = chunk.clone();
    buffer.extend_from_slice(&chunk);

    let mut stream = Lz4Stream::new();
    let mut b1 = make_dst(chunk.len());
    let n1 = stream.compress_continue_prefix(&buffer[..chunk.len()], 0, &mut b1, 1).unwrap();
    let mut b2 = make_dst(chunk.len());
    let n2 = stream.compress_continue_prefix(&buffer, chunk.len(), &mut b2, 1).unwrap();
    assert!(n2 < 32);

    let mut dec = Lz4StreamDecode::new();
    let mut out = vec![0u8; buffer.len()];
    assert_eq!(dec.decompress_continue_prefix(&b1[..n1], &mut out[..chunk.len()], 0), Ok(chunk.len()));
    assert_eq!(dec.decompress_continue_prefix(&b2[..n2], &mut out, chunk.len()), Ok(chunk.len()));
    assert_eq!(out, buffer);
}

#[test]
fn prefix_and_external_modes_decode_alike() {
    let data = lz4blk::lorem::gen_buffer(100_000, 4);
    let cuts = [0usize, 12_000, 30_000, 30_500, 70_000, 100_000];

    let mut by_prefix = Lz4Stream::new();
    let mut by_copy = Lz4Stream::new();
    let mut dec_prefix = Lz4StreamDecode::new();
    let mut dec_copy = Lz4StreamDecode::new();
    let mut restored = vec![0u8; data.len()];

    for pair in cuts.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let mut block = make_dst(end - start);
        let n = by_prefix.compress_continue_prefix(&data[..end], start, &mut block, 1).unwrap();
        let written = dec_prefix
            .decompress_continue_prefix(&block[..n], &mut restored[..end], start)
            .unwrap();
        assert_eq!(written, end - start);

        let chunk = data[start..end].to_vec();
        let block = compress_chunk(&mut by_copy, &chunk);
        let mut out = vec![0u8; chunk.len()];
        assert_eq!(dec_copy.decompress_continue(&block, &mut out), Ok(chunk.len()));
        assert_eq!(out, chunk);
    }
    assert_eq!(restored, data);
}

#[test]
fn long_stream_stays_decodable() {
    let mut stream = Lz4Stream::new();
    let mut dec = Lz4StreamDecode::new();
    for i in 0..40u32 {
        let chunk = lz4blk::lorem::gen_buffer(8_000 + (i as usize * 97), i % 3);
        let block = compress_chunk(&mut stream, &chunk);
        let mut out = vec![0u8; chunk.len()];
        assert_eq!(dec.decompress_continue(&block, &mut out), Ok(chunk.len()), "chunk {i}");
        assert_eq!(out, chunk, "chunk {i}");
        assert!(stream.dict_size() <= 64 * KB);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dictionaries
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn load_dict_return_values() {
    let mut stream = Lz4Stream::new();
    assert_eq!(stream.load_dict(&[]), 0);
    assert_eq!(stream.load_dict(&[1, 2, 3, 4, 5, 6, 7]), 0);
    assert_eq!(stream.load_dict(&[1, 2, 3, 4, 5, 6, 7, 8]), 8);
    assert_eq!(stream.load_dict(&vec![3u8; 200 * KB]), 64 * KB);
    assert_eq!(stream.dict_size(), 64 * KB);
}

#[test]
fn block_decodes_with_dictionary_tail() {
    let dict = lz4blk::lorem::gen_buffer(150_000, 5);
    let src = lz4blk::lorem::gen_buffer(20_000, 5);
    let mut stream = Lz4Stream::new();
    stream.load_dict(&dict);
    let block = compress_chunk(&mut stream, &src);

    // The whole dictionary and its last 64 KiB are equivalent to the decoder.
    let mut a = vec![0u8; src.len()];
    let mut b = vec![0u8; src.len()];
    assert_eq!(decompress_safe_using_dict(&block, &mut a, &dict), Ok(src.len()));
    let tail = &dict[dict.len() - 64 * KB..];
    assert_eq!(decompress_safe_using_dict(&block, &mut b, tail), Ok(src.len()));
    assert_eq!(a, src);
    assert_eq!(b, src);
}

#[test]
fn save_dict_then_continue_in_place() {
    let history = lz4blk::lorem::gen_buffer(90_000, 6);
    let next = lz4blk::lorem::gen_buffer(6_000, 6);

    let mut stream = Lz4Stream::new();
    let first = compress_chunk(&mut stream, &history);

    // Move the history into a caller buffer with room for the next input.
    let mut safe = vec![0u8; 64 * KB + next.len()];
    let saved = stream.save_dict(&mut safe[..64 * KB]);
    assert_eq!(saved, 64 * KB);
    assert_eq!(stream.dict_size(), saved);
    assert_eq!(&safe[..saved], &history[history.len() - saved..]);

    safe[saved..].copy_from_slice(&next);
    let mut block = make_dst(next.len());
    let n = stream.compress_continue_prefix(&safe, saved, &mut block, 1).unwrap();

    let mut out = vec![0u8; history.len()];
    assert_eq!(decompress_safe(&first, &mut out), Ok(history.len()));

    let mut joined = history[history.len() - saved..].to_vec();
    joined.resize(saved + next.len(), 0);
    assert_eq!(decompress_safe_with_prefix(&block[..n], &mut joined, saved), Ok(next.len()));
    assert_eq!(&joined[saved..], &next[..]);
}

#[test]
fn save_dict_into_small_buffer() {
    let mut stream = Lz4Stream::new();
    let src = lz4blk::lorem::gen_buffer(5_000, 7);
    compress_chunk(&mut stream, &src);

    let mut small = [0u8; 300];
    assert_eq!(stream.save_dict(&mut small), 300);
    assert_eq!(&small[..], &src[src.len() - 300..]);
    assert_eq!(stream.dict_size(), 300);

    let mut empty: [u8; 0] = [];
    assert_eq!(stream.save_dict(&mut empty), 0);
    assert_eq!(stream.dict_size(), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Failure handling
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn too_small_output_poisons_until_reset() {
    let src = lz4blk::lorem::gen_buffer(8_000, 8);
    let mut stream = Lz4Stream::new();
    let mut tiny = [0u8; 10];
    assert_eq!(stream.compress_continue(&src, &mut tiny, 1), Err(Lz4Error::OutputTooSmall));
    assert!(!stream.is_initialized());

    let mut dst = make_dst(src.len());
    assert_eq!(
        stream.compress_continue_prefix(&src, 0, &mut dst, 1),
        Err(Lz4Error::UninitializedContext)
    );

    stream.reset();
    assert!(stream.is_initialized());
    let n = stream.compress_continue(&src, &mut dst, 1).unwrap();
    let mut out = vec![0u8; src.len()];
    assert_eq!(decompress_safe(&dst[..n], &mut out), Ok(src.len()));
}

#[test]
fn load_dict_recovers_a_poisoned_context() {
    let src = lz4blk::lorem::gen_buffer(8_000, 9);
    let mut stream = Lz4Stream::new();
    let mut tiny = [0u8; 10];
    assert!(stream.compress_continue(&src, &mut tiny, 1).is_err());

    let dict = lz4blk::lorem::gen_buffer(4_000, 9);
    assert_eq!(stream.load_dict(&dict), dict.len());
    assert!(stream.is_initialized());
    let block = compress_chunk(&mut stream, &src);
    let mut out = vec![0u8; src.len()];
    assert_eq!(decompress_safe_using_dict(&block, &mut out, &dict), Ok(src.len()));
}

#[test]
fn prefix_start_past_the_end_is_rejected() {
    let chunk = pattern_chunk();
    let mut buffer = chunk.clone();
    buffer.extend_from_slice(&chunk);

    let mut stream = Lz4Stream::new();
    let mut b1 = make_dst(chunk.len());
    let n1 = stream.compress_continue_prefix(&buffer[..chunk.len()], 0, &mut b1, 1).unwrap();

    let mut scratch = make_dst(16);
    assert_eq!(
        stream.compress_continue_prefix(&buffer, buffer.len() + 1, &mut scratch, 1),
        Err(Lz4Error::StartOutOfBounds { start: buffer.len() + 1, len: buffer.len() })
    );
    assert!(stream.is_initialized());

    // The in-place history survives the rejected call.
    let mut b2 = make_dst(chunk.len());
    let n2 = stream.compress_continue_prefix(&buffer, chunk.len(), &mut b2, 1).unwrap();
    assert!(n2 < 32);

    let mut dec = Lz4StreamDecode::new();
    let mut out = vec![0u8; buffer.len()];
    assert_eq!(dec.decompress_continue_prefix(&b1[..n1], &mut out[..chunk.len()], 0), Ok(chunk.len()));
    assert_eq!(dec.decompress_continue_prefix(&b2[..n2], &mut out, chunk.len()), Ok(chunk.len()));
    assert_eq!(out, buffer);
}
