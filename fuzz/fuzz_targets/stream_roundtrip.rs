#![no_main]
use libfuzzer_sys::fuzz_target;

use lz4blk::block::{compress_bound, Lz4Stream, Lz4StreamDecode};

fuzz_target!(|data: &[u8]| {
    // Chunk boundaries come from the data itself so every split gets explored.
    let mut enc = Lz4Stream::new();
    let mut dec = Lz4StreamDecode::new();
    let mut rest = data;
    while !rest.is_empty() {
        let len = (rest[0] as usize * 37 % 4096).clamp(1, rest.len());
        let (chunk, tail) = rest.split_at(len);
        rest = tail;

        let mut block = vec![0u8; compress_bound(chunk.len())];
        let n = enc.compress_continue(chunk, &mut block, 1).expect("bound-sized output");
        let mut out = vec![0u8; chunk.len()];
        let written = dec.decompress_continue(&block[..n], &mut out).expect("stream block must decode");
        assert_eq!(written, chunk.len());
        assert_eq!(out, chunk);
    }
});
