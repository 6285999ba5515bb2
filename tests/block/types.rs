// Integration tests for block format constants and byte-level helpers
// (block/types.rs, block/table.rs)
//
//   - format constants and the derived limits
//   - little-endian reads and writes at unaligned positions
//   - count() across one buffer and across two
//   - write_length_ext() continuation-byte encoding
//   - copy_match() for fills, short periods and disjoint copies
//   - PositionTable bucket sizing, most-recent-wins and rebasing

use lz4blk::block::table::PositionTable;
use lz4blk::block::types::{
    copy_match, copy_overlapping, count, hash4, hash5, nb_common_bytes, read_le16, read_le32,
    read_le64, write_le16, write_length_ext, EarlyEnd, EndCondition, LimitedOutputDirective, GB,
    HASH_UNIT, KB, LASTLITERALS, LZ4_64KLIMIT, LZ4_DISTANCE_MAX, LZ4_HASHLOG, LZ4_HASH_SIZE_U32,
    LZ4_MAX_INPUT_SIZE, LZ4_MEMORY_USAGE, LZ4_MIN_LENGTH, MATCH_SAFEGUARD_DISTANCE, MB, MFLIMIT,
    MINMATCH, ML_BITS, ML_MASK, RUN_BITS, RUN_MASK, WILDCOPYLENGTH, WINDOW_SIZE,
};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn format_constants() {
    assert_eq!(MINMATCH, 4);
    assert_eq!(LASTLITERALS, 5);
    assert_eq!(MFLIMIT, 12);
    assert_eq!(LZ4_MIN_LENGTH, 13);
    assert_eq!(WILDCOPYLENGTH, 8);
    assert_eq!(MATCH_SAFEGUARD_DISTANCE, 12);
    assert_eq!(LZ4_DISTANCE_MAX, 65_535);
    assert_eq!(WINDOW_SIZE, 65_536);
    assert_eq!(LZ4_MAX_INPUT_SIZE, 0x7E00_0000);
}

#[test]
fn token_layout() {
    assert_eq!(ML_BITS, 4);
    assert_eq!(RUN_BITS, 4);
    assert_eq!(ML_MASK, 15);
    assert_eq!(RUN_MASK, 15);
}

#[test]
fn table_sizing() {
    assert_eq!(LZ4_MEMORY_USAGE, 14);
    assert_eq!(LZ4_HASHLOG, 12);
    assert_eq!(LZ4_HASH_SIZE_U32, 4096);
    assert_eq!(LZ4_64KLIMIT, 65_536 + 11);
    assert_eq!(HASH_UNIT, 8);
}

#[test]
fn size_units() {
    assert_eq!(KB, 1024);
    assert_eq!(MB, 1024 * 1024);
    assert_eq!(GB, 1024 * 1024 * 1024);
}

#[test]
fn directive_enums_compare() {
    assert_ne!(LimitedOutputDirective::NotLimited, LimitedOutputDirective::LimitedOutput);
    assert_ne!(EndCondition::OnInputSize, EndCondition::OnOutputSize);
    assert_ne!(EarlyEnd::Full, EarlyEnd::Partial);
}

// ─────────────────────────────────────────────────────────────────────────────
// Little-endian access
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn little_endian_reads_at_odd_positions() {
    let buf = [0xAA, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0xBB];
    assert_eq!(read_le16(&buf, 1), 0x0201);
    assert_eq!(read_le32(&buf, 1), 0x0403_0201);
    assert_eq!(read_le64(&buf, 1), 0x0807_0605_0403_0201);
}

#[test]
fn write_le16_places_low_byte_first() {
    let mut buf = [0u8; 5];
    write_le16(&mut buf, 3, 0xBEEF);
    assert_eq!(buf, [0, 0, 0, 0xEF, 0xBE]);
    assert_eq!(read_le16(&buf, 3), 0xBEEF);
}

// ─────────────────────────────────────────────────────────────────────────────
// count
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn nb_common_bytes_counts_low_zero_bytes() {
    assert_eq!(nb_common_bytes(1), 0);
    assert_eq!(nb_common_bytes(0x100), 1);
    assert_eq!(nb_common_bytes(0x00FF_0000_0000_0000), 6);
    assert_eq!(nb_common_bytes(1 << 63), 7);
}

#[test]
fn count_within_one_buffer() {
    let data = b"abcdefgh_abcdefgh_abcdXfgh";
    // Positions 0 and 9 agree for "abcdefgh_abcd" minus the trailing mismatch.
    assert_eq!(count(data, 9, data, 0, data.len()), 13);
    assert_eq!(count(data, 18, data, 0, data.len()), 4);
}

#[test]
fn count_respects_input_limit() {
    let data = [7u8; 64];
    assert_eq!(count(&data, 10, &data, 0, 30), 20);
    assert_eq!(count(&data, 10, &data, 0, 10), 0);
}

#[test]
fn count_stops_at_reference_end() {
    let input = b"xyzxyzxyzxyz";
    let reference = b"xyzxy";
    assert_eq!(count(input, 0, reference, 0, input.len()), 5);
    assert_eq!(count(input, 3, reference, 0, input.len()), 5);
}

// ─────────────────────────────────────────────────────────────────────────────
// Length continuation bytes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn length_extension_encoding() {
    let mut buf = [0u8; 8];
    assert_eq!(write_length_ext(&mut buf, 0, 0), 1);
    assert_eq!(buf[0], 0);

    let mut buf = [0u8; 8];
    assert_eq!(write_length_ext(&mut buf, 0, 254), 1);
    assert_eq!(buf[0], 254);

    let mut buf = [0u8; 8];
    assert_eq!(write_length_ext(&mut buf, 0, 255), 2);
    assert_eq!(&buf[..2], &[255, 0]);

    let mut buf = [0u8; 8];
    assert_eq!(write_length_ext(&mut buf, 2, 600), 5);
    assert_eq!(&buf[2..5], &[255, 255, 90]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Match copy
// ─────────────────────────────────────────────────────────────────────────────

/// Reference semantics: a byte-at-a-time forward copy.
fn bytewise(buf: &mut [u8], op: usize, offset: usize, len: usize) {
    for i in 0..len {
        buf[op + i] = buf[op + i - offset];
    }
}

#[test]
fn copy_match_agrees_with_bytewise_copy() {
    let seed: Vec<u8> = (1..=40u8).collect();
    for offset in 1..=20usize {
        for len in [1usize, 3, 4, 7, 8, 15, 19, 33, 64] {
            let mut fast = seed.clone();
            fast.resize(40 + len, 0);
            let mut slow = fast.clone();
            copy_match(&mut fast, 40, offset, len);
            bytewise(&mut slow, 40, offset, len);
            assert_eq!(fast, slow, "offset {offset} len {len}");
        }
    }
}

#[test]
fn offset_one_is_a_fill() {
    let mut buf = vec![0u8; 20];
    buf[4] = b'z';
    copy_match(&mut buf, 5, 1, 15);
    assert!(buf[4..].iter().all(|&b| b == b'z'));
}

#[test]
fn copy_overlapping_repeats_period() {
    let mut buf = *b"abc.........";
    copy_overlapping(&mut buf, 0, 3, 9);
    assert_eq!(&buf, b"abcabcabcabc");
}

// ─────────────────────────────────────────────────────────────────────────────
// Hashing and the position table
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn hashes_stay_within_log() {
    for seq in [0u32, 1, 0xDEAD_BEEF, u32::MAX] {
        assert!(hash4(seq, 12) < 4096);
        assert!(hash4(seq, 13) < 8192);
        assert!(hash5(seq as u64 | (0xAB << 32), 12) < 4096);
    }
}

#[test]
fn hash5_ignores_top_three_bytes() {
    let a = 0x0000_0012_3456_789Au64;
    let b = 0xFFEE_DD12_3456_789Au64;
    assert_eq!(hash5(a, 12), hash5(b, 12));
}

#[test]
fn position_table_buckets_and_recency() {
    assert_eq!(PositionTable::<u16>::new().len(), 2 * LZ4_HASH_SIZE_U32);
    assert_eq!(PositionTable::<u32>::new().len(), LZ4_HASH_SIZE_U32);

    let data = b"0123456789abcdef0123456789abcdef";
    let mut table = PositionTable::<u32>::new();
    let bucket = PositionTable::<u32>::hash(data, 0);
    assert_eq!(bucket, PositionTable::<u32>::hash(data, 16));

    table.insert(data, 0, 100);
    table.insert(data, 16, 116);
    assert_eq!(table.get(bucket), 116);

    table.clear();
    assert_eq!(table.get(bucket), 0);
}

#[test]
fn rebase_saturates_at_zero() {
    let mut table = PositionTable::<u32>::new();
    table.put(0, 10);
    table.put(1, 5_000);
    table.rebase(1_000);
    assert_eq!(table.get(0), 0);
    assert_eq!(table.get(1), 4_000);
}
