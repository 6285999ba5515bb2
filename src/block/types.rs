//! Block-format constants, mode directives, and bounds-checked byte helpers.
//!
//! Everything here works on plain slices plus `usize` cursors. A helper that
//! is handed a position outside its slice panics through normal slice
//! indexing; callers in the codec check their limits first, so a panic here
//! means a codec bug rather than bad input.

// ─────────────────────────────────────────────────────────────────────────────
// Format constants
// ─────────────────────────────────────────────────────────────────────────────

/// Minimum match length encoded in a block.
pub const MINMATCH: usize = 4;

/// Granularity of the decoder's "near the output end" check in fast mode.
pub const WILDCOPYLENGTH: usize = 8;

/// The last N bytes of a block are always literals.
pub const LASTLITERALS: usize = 5;

/// A match must start at least this many bytes before the end of the input.
pub const MFLIMIT: usize = 12;

/// Partial decoding clamps matches that end closer than this to the target.
pub const MATCH_SAFEGUARD_DISTANCE: usize = 2 * WILDCOPYLENGTH - MINMATCH;

/// Inputs shorter than this are emitted as a single literal run.
pub const LZ4_MIN_LENGTH: usize = MFLIMIT + 1;

pub const KB: usize = 1 << 10;
pub const MB: usize = 1 << 20;
pub const GB: usize = 1 << 30;

/// Largest backward offset the format can express.
pub const LZ4_DISTANCE_MAX: usize = 65_535;

/// Size of the dictionary window carried between streaming calls.
pub const WINDOW_SIZE: usize = 64 * KB;

pub const ML_BITS: u32 = 4;
pub const ML_MASK: usize = (1 << ML_BITS) - 1;
pub const RUN_BITS: u32 = 8 - ML_BITS;
pub const RUN_MASK: usize = (1 << RUN_BITS) - 1;

// ─────────────────────────────────────────────────────────────────────────────
// Position-table sizing (LZ4_MEMORY_USAGE = 14 → 16 KiB of u32 slots)
// ─────────────────────────────────────────────────────────────────────────────

/// Log₂ of the position table's memory budget in bytes.
pub const LZ4_MEMORY_USAGE: u32 = 14;
/// Hash bits kept for 32-bit and pointer-width tables.
pub const LZ4_HASHLOG: u32 = LZ4_MEMORY_USAGE - 2;
/// Number of slots in a `u32` table.
pub const LZ4_HASH_SIZE_U32: usize = 1 << LZ4_HASHLOG;

/// Inputs shorter than this fit 16-bit positions (every hashed position is
/// below `LZ4_64KLIMIT - MFLIMIT + 1 <= u16::MAX`).
pub const LZ4_64KLIMIT: usize = (64 * KB) + (MFLIMIT - 1);

/// Higher → faster on incompressible data at the cost of ratio.
pub const LZ4_SKIP_TRIGGER: u32 = 6;

/// Largest input the encoder accepts.
pub const LZ4_MAX_INPUT_SIZE: usize = 0x7E00_0000;

/// Bytes a dictionary must hold before `load_dict` hashes anything.
pub const HASH_UNIT: usize = 8;

// ─────────────────────────────────────────────────────────────────────────────
// Directives chosen once per call
// ─────────────────────────────────────────────────────────────────────────────

/// How the encoder treats the destination capacity.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LimitedOutputDirective {
    /// The destination holds at least `compress_bound(src.len())` bytes.
    NotLimited,
    /// Fail with `OutputTooSmall` as soon as the next token might not fit.
    LimitedOutput,
    /// Stop early and report how much input fit (`compress_dest_size`).
    FillOutput,
}

/// Which length terminates decoding.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EndCondition {
    /// Safe decoding: stop when the compressed input is exhausted.
    OnInputSize,
    /// Fast decoding: stop when the output reaches the exact original size.
    OnOutputSize,
}

/// Whether the decoder may stop before the block is complete.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EarlyEnd {
    Full,
    Partial,
}

// ─────────────────────────────────────────────────────────────────────────────
// Little-endian access
// ─────────────────────────────────────────────────────────────────────────────

#[inline(always)]
pub fn read_le16(buf: &[u8], pos: usize) -> u16 {
    u16::from_le_bytes([buf[pos], buf[pos + 1]])
}

#[inline(always)]
pub fn read_le32(buf: &[u8], pos: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&buf[pos..pos + 4]);
    u32::from_le_bytes(word)
}

#[inline(always)]
pub fn read_le64(buf: &[u8], pos: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&buf[pos..pos + 8]);
    u64::from_le_bytes(word)
}

#[inline(always)]
pub fn write_le16(buf: &mut [u8], pos: usize, value: u16) {
    buf[pos..pos + 2].copy_from_slice(&value.to_le_bytes());
}

// ─────────────────────────────────────────────────────────────────────────────
// Match-length helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Number of equal low-order bytes given the XOR of two little-endian words.
#[inline(always)]
pub fn nb_common_bytes(diff: u64) -> usize {
    debug_assert!(diff != 0);
    (diff.trailing_zeros() / 8) as usize
}

/// Count how many bytes `input[in_pos..]` shares with `reference[ref_pos..]`.
///
/// Counting stops at `in_limit` on the input side and at the end of
/// `reference`. Both slices may be the same buffer.
pub fn count(input: &[u8], in_pos: usize, reference: &[u8], ref_pos: usize, in_limit: usize) -> usize {
    let limit = in_limit.min(in_pos + reference.len().saturating_sub(ref_pos));
    let start = in_pos;
    let mut ip = in_pos;
    let mut mp = ref_pos;

    while ip + 8 <= limit {
        let diff = read_le64(input, ip) ^ read_le64(reference, mp);
        if diff != 0 {
            return ip + nb_common_bytes(diff) - start;
        }
        ip += 8;
        mp += 8;
    }
    while ip < limit && input[ip] == reference[mp] {
        ip += 1;
        mp += 1;
    }
    ip - start
}

/// Write the continuation bytes for a length whose nibble saturated.
///
/// `extra` is the length minus the nibble maximum (15). Returns the new
/// output cursor.
#[inline]
pub fn write_length_ext(dst: &mut [u8], mut op: usize, mut extra: usize) -> usize {
    if extra >= 255 {
        let full = extra / 255;
        dst[op..op + full].fill(255);
        op += full;
        extra -= full * 255;
    }
    dst[op] = extra as u8;
    op + 1
}

// ─────────────────────────────────────────────────────────────────────────────
// Match copy
// ─────────────────────────────────────────────────────────────────────────────

/// Copy `len` bytes that start `offset` bytes behind `op` inside `buf`.
///
/// Overlapping matches repeat the last `offset` bytes. Offset 1 is a fill;
/// other short offsets grow the copied run each step so a repeating pattern
/// is replicated with a handful of `copy_within` calls.
#[inline]
pub fn copy_match(buf: &mut [u8], op: usize, offset: usize, len: usize) {
    debug_assert!(offset >= 1 && offset <= op);
    let from = op - offset;
    if offset >= len {
        buf.copy_within(from..from + len, op);
    } else if offset == 1 {
        let byte = buf[from];
        buf[op..op + len].fill(byte);
    } else {
        copy_overlapping(buf, from, op, len);
    }
}

/// Byte-by-byte forward-copy semantics for `buf[op..op+len] = buf[from..]`
/// where the ranges may overlap (`from < op`).
///
/// The region `buf[from..op]` repeats with period `op - from`, so copying
/// from the fixed start `from` in chunks of the already-written length is
/// equivalent to a byte loop.
pub fn copy_overlapping(buf: &mut [u8], from: usize, mut op: usize, len: usize) {
    let end = op + len;
    while op < end {
        let chunk = (op - from).min(end - op);
        buf.copy_within(from..from + chunk, op);
        op += chunk;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Hashing
// ─────────────────────────────────────────────────────────────────────────────

/// Knuth multiplicative hash of a 4-byte sequence, keeping `hash_log` bits.
#[inline(always)]
pub fn hash4(sequence: u32, hash_log: u32) -> usize {
    (sequence.wrapping_mul(2_654_435_761) >> (32 - hash_log)) as usize
}

/// Hash of the low 5 bytes of a little-endian 8-byte read, keeping `hash_log` bits.
#[inline(always)]
pub fn hash5(sequence: u64, hash_log: u32) -> usize {
    const PRIME5BYTES: u64 = 889_523_592_379;
    ((sequence << 24).wrapping_mul(PRIME5BYTES) >> (64 - hash_log)) as usize
}
