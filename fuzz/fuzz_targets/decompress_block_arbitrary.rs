#![no_main]
use libfuzzer_sys::fuzz_target;

use lz4blk::block::{
    decompress_fast, decompress_safe, decompress_safe_partial, decompress_safe_using_dict,
};

fuzz_target!(|data: &[u8]| {
    // Err results are expected; the target checks for panics only.
    for size in [0usize, 16, 4096, data.len().saturating_mul(255).min(1 << 20)] {
        let mut dst = vec![0u8; size];
        let _ = decompress_safe(data, &mut dst);
        let _ = decompress_fast(data, &mut dst);
        let _ = decompress_safe_partial(data, &mut dst, size / 2);
        let _ = decompress_safe_using_dict(data, &mut dst, b"a short external dictionary");
    }
});
