//! E2E Test Suite 02: Block Streaming API
//!
//! Drives `Lz4Stream` and `Lz4StreamDecode` the way a message transport
//! would: a long payload cut into blocks, each block shipped on its own and
//! decoded with the history of the ones before it.
//! - separate input buffers (history kept by the context)
//! - one contiguous input buffer (history referenced in place)
//! - a decoder ring buffer sized by decoder_ring_buffer_size
//! - shared dictionaries
//! - save_dict hand-off

use lz4blk::block::{
    compress_bound, decoder_ring_buffer_size, decompress_safe, decompress_safe_using_dict,
    Lz4Stream, Lz4StreamDecode,
};

fn encode_chunks(stream: &mut Lz4Stream, payload: &[u8], chunk: usize) -> Vec<Vec<u8>> {
    payload
        .chunks(chunk)
        .map(|piece| {
            let mut block = vec![0u8; compress_bound(piece.len())];
            let n = stream
                .compress_continue(piece, &mut block, 1)
                .expect("streaming compression should succeed");
            block.truncate(n);
            block
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: chunked transfer with separate buffers
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_multi_chunk_streaming() {
    let payload = lz4blk::lorem::gen_buffer(300_000, 1);
    let blocks = encode_chunks(&mut Lz4Stream::new(), &payload, 8 * 1024);

    let mut dec = Lz4StreamDecode::new();
    let mut restored = Vec::with_capacity(payload.len());
    for (block, expected) in blocks.iter().zip(payload.chunks(8 * 1024)) {
        let mut out = vec![0u8; expected.len()];
        assert_eq!(dec.decompress_continue(block, &mut out), Ok(expected.len()));
        restored.extend_from_slice(&out);
    }
    assert_eq!(restored, payload);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: streaming beats independent blocks on small chunks
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_streaming_uses_history() {
    let payload = lz4blk::lorem::gen_buffer(64 * 1024, 2);
    let streamed: usize = encode_chunks(&mut Lz4Stream::new(), &payload, 1024)
        .iter()
        .map(Vec::len)
        .sum();
    let independent: usize = payload
        .chunks(1024)
        .map(|piece| lz4blk::compress(piece).unwrap().len())
        .sum();
    assert!(streamed < independent, "streamed {streamed} vs independent {independent}");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: contiguous input and output buffers
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_contiguous_prefix_streaming() {
    let payload = lz4blk::lorem::gen_buffer(200_000, 3);
    let mut enc = Lz4Stream::new();
    let mut dec = Lz4StreamDecode::new();
    let mut restored = vec![0u8; payload.len()];

    let mut pos = 0;
    while pos < payload.len() {
        let end = (pos + 10_000).min(payload.len());
        let mut block = vec![0u8; compress_bound(end - pos)];
        let n = enc.compress_continue_prefix(&payload[..end], pos, &mut block, 1).unwrap();
        let written = dec
            .decompress_continue_prefix(&block[..n], &mut restored[..end], pos)
            .unwrap();
        assert_eq!(written, end - pos);
        pos = end;
    }
    assert_eq!(restored, payload);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: decoder ring buffer
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_decoder_ring_buffer() {
    const MAX_BLOCK: usize = 8 * 1024;
    let payload = lz4blk::lorem::gen_buffer(500_000, 4);
    let blocks = encode_chunks(&mut Lz4Stream::new(), &payload, MAX_BLOCK);

    let mut ring = vec![0u8; decoder_ring_buffer_size(MAX_BLOCK).unwrap()];
    let mut dec = Lz4StreamDecode::new();
    let mut pos = 0;
    let mut restored = Vec::with_capacity(payload.len());
    for block in &blocks {
        if pos + MAX_BLOCK > ring.len() {
            pos = 0;
        }
        let n = dec
            .decompress_continue_prefix(block, &mut ring[..pos + MAX_BLOCK], pos)
            .unwrap();
        restored.extend_from_slice(&ring[pos..pos + n]);
        pos += n;
    }
    assert_eq!(restored, payload);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: shared dictionary for small records
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_dictionary_for_small_records() {
    let dict = br#"{"user":"","action":"login","status":"ok","region":"eu-west"}"#.repeat(8);
    let record = br#"{"user":"ada","action":"login","status":"ok","region":"eu-west"}"#;

    let mut with_dict = Lz4Stream::new();
    with_dict.load_dict(&dict);
    let mut block = vec![0u8; compress_bound(record.len())];
    let n = with_dict.compress_continue(record, &mut block, 1).unwrap();
    let plain = lz4blk::compress(record).unwrap();
    assert!(n < plain.len(), "dictionary block {n} vs plain {}", plain.len());

    let mut out = vec![0u8; record.len()];
    assert_eq!(decompress_safe_using_dict(&block[..n], &mut out, &dict), Ok(record.len()));
    assert_eq!(&out[..], &record[..]);

    let mut dec = Lz4StreamDecode::new();
    dec.set_dict(&dict);
    let mut out = vec![0u8; record.len()];
    assert_eq!(dec.decompress_continue(&block[..n], &mut out), Ok(record.len()));
    assert_eq!(&out[..], &record[..]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 6: reset between messages
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_stream_reset_between_messages() {
    let message1 = lz4blk::lorem::gen_buffer(20_000, 5);
    let message2 = lz4blk::lorem::gen_buffer(20_000, 5);
    let mut stream = Lz4Stream::new();
    encode_chunks(&mut stream, &message1, 20_000);
    stream.reset();
    let blocks = encode_chunks(&mut stream, &message2, 20_000);

    // After a reset the block stands alone.
    let mut out = vec![0u8; message2.len()];
    assert_eq!(decompress_safe(&blocks[0], &mut out), Ok(message2.len()));
    assert_eq!(out, message2);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 7: save_dict before the input buffer is reused
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_save_dict_handoff() {
    let payload = lz4blk::lorem::gen_buffer(40_000, 6);
    let (first, second) = payload.split_at(20_000);

    let mut stream = Lz4Stream::new();
    let mut reused = first.to_vec();
    let b1 = encode_chunks(&mut stream, &reused, reused.len());

    let mut safe = vec![0u8; 64 * 1024];
    let saved = stream.save_dict(&mut safe);
    assert_eq!(saved, first.len());

    // The caller overwrites its input buffer; the context no longer needs it.
    reused.fill(0);
    reused.copy_from_slice(second);
    let b2 = encode_chunks(&mut stream, &reused, reused.len());

    let mut dec = Lz4StreamDecode::new();
    let mut out1 = vec![0u8; first.len()];
    let mut out2 = vec![0u8; second.len()];
    assert_eq!(dec.decompress_continue(&b1[0], &mut out1), Ok(first.len()));
    assert_eq!(dec.decompress_continue(&b2[0], &mut out2), Ok(second.len()));
    assert_eq!(out1, first);
    assert_eq!(out2, second);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 8: empty blocks in the middle of a stream
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_chunks_keep_history() {
    let a = lz4blk::lorem::gen_buffer(5_000, 7);
    let mut enc = Lz4Stream::new();
    let mut dec = Lz4StreamDecode::new();
    for piece in [&a[..], &[][..], &a[..]] {
        let mut block = vec![0u8; compress_bound(piece.len())];
        let n = enc.compress_continue(piece, &mut block, 1).unwrap();
        let mut out = vec![0u8; piece.len()];
        assert_eq!(dec.decompress_continue(&block[..n], &mut out), Ok(piece.len()));
        assert_eq!(out, piece);
    }
}
