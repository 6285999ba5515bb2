//! Block compression: greedy parse, single-shot entry points, bounded variant.
//!
//! | Function                       | Purpose                                            |
//! |--------------------------------|----------------------------------------------------|
//! | [`compress_generic`]           | The parse loop shared by every entry point         |
//! | [`compress_fast`]              | Single-shot compression with an acceleration knob  |
//! | [`compress_default`]           | [`compress_fast`] with acceleration 1              |
//! | [`compress_fast_ext_state`]    | Single-shot, reusing a stream context's table      |
//! | [`compress_dest_size`]         | Compress as much input as fits a fixed budget      |
//! | [`compress_block_to_vec`]      | Allocate a bound-sized `Vec` and compress into it  |
//!
//! Every compressed sequence is a literal run followed by a match (offset +
//! length); the block ends with a literal-only run covering at least the last
//! [`LASTLITERALS`] input bytes. Capacity problems surface as
//! [`Err(Lz4Error::OutputTooSmall)`](Lz4Error::OutputTooSmall) and no partially
//! written block is ever reported as a success.

use thiserror::Error;

use super::stream::Lz4Stream;
use super::table::{PositionTable, TableIndex};
use super::types::{
    count, read_le32, write_le16, write_length_ext, LimitedOutputDirective, LASTLITERALS,
    LZ4_64KLIMIT, LZ4_DISTANCE_MAX, LZ4_MIN_LENGTH, LZ4_SKIP_TRIGGER, MFLIMIT, MINMATCH,
    ML_BITS, ML_MASK, RUN_MASK,
};

pub use super::types::LZ4_MAX_INPUT_SIZE;

/// Default acceleration factor (check every position).
pub const LZ4_ACCELERATION_DEFAULT: i32 = 1;

/// Largest acceleration factor honoured; larger values are clamped.
pub const LZ4_ACCELERATION_MAX: i32 = 65_537;

// ─────────────────────────────────────────────────────────────────────────────
// Error type
// ─────────────────────────────────────────────────────────────────────────────

/// Errors returned by block and streaming compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Lz4Error {
    /// The destination cannot hold the compressed block.
    #[error("destination buffer too small for the compressed block")]
    OutputTooSmall,
    /// The input exceeds [`LZ4_MAX_INPUT_SIZE`].
    #[error("input exceeds the maximum block input size of {} bytes", LZ4_MAX_INPUT_SIZE)]
    InputTooLarge,
    /// The streaming context is not in a reset state.
    #[error("streaming context used without a reset")]
    UninitializedContext,
    /// A prefix-mode start position lies past the end of its buffer.
    #[error("start position {start} is past the end of a {len}-byte buffer")]
    StartOutOfBounds { start: usize, len: usize },
}

/// Worst-case compressed size for `input_size` bytes.
///
/// Returns 0 if `input_size` exceeds [`LZ4_MAX_INPUT_SIZE`].
#[inline]
pub fn compress_bound(input_size: usize) -> usize {
    if input_size > LZ4_MAX_INPUT_SIZE {
        0
    } else {
        input_size + input_size / 255 + 16
    }
}

#[inline]
fn clamp_acceleration(acceleration: i32) -> usize {
    if acceleration < 1 {
        LZ4_ACCELERATION_DEFAULT as usize
    } else {
        acceleration.min(LZ4_ACCELERATION_MAX) as usize
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Match sources
// ─────────────────────────────────────────────────────────────────────────────

/// Bytes that precede the input and may be referenced by matches.
#[derive(Clone, Copy, Debug)]
pub enum Window<'w> {
    /// Nothing precedes the input.
    NoDict,
    /// The last `n` bytes before `start` in the same buffer.
    Prefix(usize),
    /// A separate buffer whose last byte logically precedes `data[start]`.
    External(&'w [u8]),
}

/// The input of one encode call together with the window it may reference.
#[derive(Clone, Copy, Debug)]
pub struct EncodeSource<'a> {
    /// Buffer holding the input at `data[start..]`.
    pub data: &'a [u8],
    pub start: usize,
    pub window: Window<'a>,
}

/// A confirmed candidate, located in the input buffer or the external window.
#[derive(Clone, Copy, Debug)]
enum MatchSource {
    Input(usize),
    Dict(usize),
}

impl<'a> EncodeSource<'a> {
    /// A standalone input with no history.
    pub fn single(src: &'a [u8]) -> Self {
        EncodeSource { data: src, start: 0, window: Window::NoDict }
    }

    /// Lowest index of `data` a match may start at.
    #[inline(always)]
    fn low_limit(&self) -> usize {
        match self.window {
            Window::Prefix(len) => self.start - len,
            Window::NoDict | Window::External(_) => self.start,
        }
    }

    #[inline(always)]
    fn dict(&self) -> &'a [u8] {
        match self.window {
            Window::External(dict) => dict,
            _ => &[],
        }
    }

    /// Resolve a backward distance from `ip` to the bytes it designates.
    #[inline(always)]
    fn locate(&self, ip: usize, distance: usize) -> Option<MatchSource> {
        if distance == 0 || distance > LZ4_DISTANCE_MAX {
            return None;
        }
        let reachable = ip - self.low_limit();
        if distance <= reachable {
            return Some(MatchSource::Input(ip - distance));
        }
        let dict = self.dict();
        let back = distance - reachable;
        if back <= dict.len() {
            Some(MatchSource::Dict(dict.len() - back))
        } else {
            None
        }
    }

    /// Whether the four bytes at `ip` equal the four bytes at `source`.
    #[inline(always)]
    fn confirms(&self, ip: usize, source: MatchSource) -> bool {
        let data = self.data;
        match source {
            MatchSource::Input(mp) => read_le32(data, mp) == read_le32(data, ip),
            MatchSource::Dict(dp) => {
                let dict = self.dict();
                if dp + MINMATCH <= dict.len() {
                    read_le32(dict, dp) == read_le32(data, ip)
                } else {
                    // The sequence runs off the window into the input start.
                    let head = dict.len() - dp;
                    dict[dp..] == data[ip..ip + head]
                        && data[self.start..self.start + MINMATCH - head]
                            == data[ip + head..ip + MINMATCH]
                }
            }
        }
    }

    /// Extend a confirmed match backwards over equal bytes, never past `anchor`.
    #[inline(always)]
    fn catch_up(&self, mut ip: usize, anchor: usize, source: MatchSource) -> (usize, MatchSource) {
        let data = self.data;
        match source {
            MatchSource::Input(mut mp) => {
                let low = self.low_limit();
                while ip > anchor && mp > low && data[ip - 1] == data[mp - 1] {
                    ip -= 1;
                    mp -= 1;
                }
                (ip, MatchSource::Input(mp))
            }
            MatchSource::Dict(mut dp) => {
                let dict = self.dict();
                while ip > anchor && dp > 0 && data[ip - 1] == dict[dp - 1] {
                    ip -= 1;
                    dp -= 1;
                }
                (ip, MatchSource::Dict(dp))
            }
        }
    }

    /// Full length of a confirmed match starting at `ip`, bounded by `matchlimit`.
    #[inline(always)]
    fn match_length(&self, ip: usize, source: MatchSource, matchlimit: usize) -> usize {
        let data = self.data;
        match source {
            MatchSource::Input(mp) => {
                MINMATCH + count(data, ip + MINMATCH, data, mp + MINMATCH, matchlimit)
            }
            MatchSource::Dict(dp) => {
                let dict = self.dict();
                let in_dict = dict.len() - dp;
                let len = count(data, ip, dict, dp, matchlimit);
                if len == in_dict {
                    // Reached the end of the window: keep counting from the input start.
                    len + count(data, ip + len, data, self.start, matchlimit)
                } else {
                    len
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Core compression loop
// ─────────────────────────────────────────────────────────────────────────────

/// Compress `source.data[source.start..]` into `dst`.
///
/// `start_index` is the logical position of the first input byte; positions
/// stored in `table` are logical, so a stream context can keep its table
/// across calls. Returns `(written, consumed)`; `consumed` is the full input
/// length except under [`LimitedOutputDirective::FillOutput`].
///
/// Under [`LimitedOutputDirective::NotLimited`] the caller guarantees
/// `dst.len() >= compress_bound(input_len)`.
pub fn compress_generic<I: TableIndex>(
    table: &mut PositionTable<I>,
    source: &EncodeSource<'_>,
    start_index: usize,
    dst: &mut [u8],
    output_directive: LimitedOutputDirective,
    acceleration: i32,
) -> Result<(usize, usize), Lz4Error> {
    let data = source.data;
    let start = source.start;
    let input_size = data.len() - start;
    if input_size > LZ4_MAX_INPUT_SIZE {
        return Err(Lz4Error::InputTooLarge);
    }
    if output_directive == LimitedOutputDirective::FillOutput && dst.is_empty() {
        return Ok((0, 0));
    }

    let acceleration = clamp_acceleration(acceleration);
    let logical = |p: usize| start_index + (p - start);

    let iend = data.len();
    let olimit = dst.len();
    let mut ip = start;
    let mut anchor = start;
    let mut op = 0usize;

    'compress: {
        if input_size < LZ4_MIN_LENGTH {
            break 'compress;
        }
        let mflimit_plus_one = iend - MFLIMIT + 1;
        let matchlimit = iend - LASTLITERALS;

        table.insert(data, ip, logical(ip));
        ip += 1;
        let mut forward_h = PositionTable::<I>::hash(data, ip);

        'main: loop {
            // ── Find a match ─────────────────────────────────────────────────
            let (found, mut distance) = {
                let mut forward_ip = ip;
                let mut step = 1usize;
                let mut search_match_nb = acceleration << LZ4_SKIP_TRIGGER;
                loop {
                    let h = forward_h;
                    let current = logical(forward_ip);
                    let candidate = table.get(h);

                    ip = forward_ip;
                    forward_ip += step;
                    step = search_match_nb >> LZ4_SKIP_TRIGGER;
                    search_match_nb += 1;

                    if forward_ip > mflimit_plus_one {
                        break 'compress;
                    }

                    forward_h = PositionTable::<I>::hash(data, forward_ip);
                    table.put(h, current);

                    // Slots may hold positions at or past `current` after a
                    // bounded parse backed up over them.
                    if candidate >= current {
                        continue;
                    }
                    let distance = current - candidate;
                    if let Some(m) = source.locate(ip, distance) {
                        if source.confirms(ip, m) {
                            break (m, distance);
                        }
                    }
                }
            };

            // ── Catch up ─────────────────────────────────────────────────────
            let (caught_ip, mut matched) = source.catch_up(ip, anchor, found);
            ip = caught_ip;

            // ── Encode literals ──────────────────────────────────────────────
            let lit_length = ip - anchor;
            let mut token = op;
            op += 1;

            match output_directive {
                LimitedOutputDirective::LimitedOutput
                    if op + lit_length + 2 + 1 + LASTLITERALS + lit_length / 255 > olimit =>
                {
                    return Err(Lz4Error::OutputTooSmall);
                }
                LimitedOutputDirective::FillOutput
                    if op + (lit_length + 240) / 255 + lit_length + 2 + 1 + MFLIMIT - MINMATCH
                        > olimit =>
                {
                    op = token;
                    break 'compress;
                }
                _ => {}
            }

            if lit_length >= RUN_MASK {
                dst[token] = (RUN_MASK << ML_BITS) as u8;
                op = write_length_ext(dst, op, lit_length - RUN_MASK);
            } else {
                dst[token] = (lit_length << ML_BITS) as u8;
            }
            dst[op..op + lit_length].copy_from_slice(&data[anchor..ip]);
            op += lit_length;

            // ── Encode match, then test the next position for a re-match ─────
            'next_match: loop {
                if output_directive == LimitedOutputDirective::FillOutput
                    && op + 2 + 1 + MFLIMIT - MINMATCH > olimit
                {
                    op = token;
                    break 'compress;
                }

                write_le16(dst, op, distance as u16);
                op += 2;

                let match_length = source.match_length(ip, matched, matchlimit);
                let mut match_code = match_length - MINMATCH;
                ip += match_length;

                if output_directive != LimitedOutputDirective::NotLimited
                    && op + 1 + LASTLITERALS + (match_code + 240) / 255 > olimit
                {
                    if output_directive == LimitedOutputDirective::LimitedOutput {
                        return Err(Lz4Error::OutputTooSmall);
                    }
                    // Shorten the match so its length bytes plus a minimal
                    // final literal run still fit.
                    let space = olimit - op;
                    let fitting_code = 14 + space.saturating_sub(1 + LASTLITERALS) * 255;
                    if fitting_code < match_code {
                        ip -= match_code - fitting_code;
                        match_code = fitting_code;
                    }
                }

                if match_code >= ML_MASK {
                    dst[token] |= ML_MASK as u8;
                    op = write_length_ext(dst, op, match_code - ML_MASK);
                } else {
                    dst[token] |= match_code as u8;
                }

                anchor = ip;
                if ip >= mflimit_plus_one {
                    break 'compress;
                }

                table.insert(data, ip - 2, logical(ip - 2));

                let h = PositionTable::<I>::hash(data, ip);
                let current = logical(ip);
                let candidate = table.get(h);
                table.put(h, current);
                if candidate < current {
                    let next_distance = current - candidate;
                    if let Some(m) = source.locate(ip, next_distance) {
                        if source.confirms(ip, m) {
                            token = op;
                            dst[op] = 0;
                            op += 1;
                            matched = m;
                            distance = next_distance;
                            continue 'next_match;
                        }
                    }
                }

                ip += 1;
                forward_h = PositionTable::<I>::hash(data, ip);
                continue 'main;
            }
        }
    }

    // ── Final literal run ────────────────────────────────────────────────────
    let mut last_run = iend - anchor;
    if output_directive != LimitedOutputDirective::NotLimited
        && op + last_run + 1 + (last_run + 255 - RUN_MASK) / 255 > olimit
    {
        if output_directive == LimitedOutputDirective::LimitedOutput {
            return Err(Lz4Error::OutputTooSmall);
        }
        last_run = olimit.saturating_sub(op + 1);
        last_run -= (last_run + 256 - RUN_MASK) / 256;
        last_run = last_run.min(iend - anchor);
    }

    if last_run >= RUN_MASK {
        dst[op] = (RUN_MASK << ML_BITS) as u8;
        op = write_length_ext(dst, op + 1, last_run - RUN_MASK);
    } else {
        dst[op] = (last_run << ML_BITS) as u8;
        op += 1;
    }
    dst[op..op + last_run].copy_from_slice(&data[anchor..anchor + last_run]);
    op += last_run;

    Ok((op, anchor + last_run - start))
}

/// Run [`compress_generic`] over a standalone input with a fresh table whose
/// index width suits the input size.
fn compress_with_transient_table(
    src: &[u8],
    dst: &mut [u8],
    output_directive: LimitedOutputDirective,
    acceleration: i32,
) -> Result<(usize, usize), Lz4Error> {
    let source = EncodeSource::single(src);
    if src.len() < LZ4_64KLIMIT {
        let mut table = PositionTable::<u16>::new();
        compress_generic(&mut table, &source, 0, dst, output_directive, acceleration)
    } else if cfg!(target_pointer_width = "64") {
        let mut table = PositionTable::<u32>::new();
        compress_generic(&mut table, &source, 0, dst, output_directive, acceleration)
    } else {
        let mut table = PositionTable::<usize>::new();
        compress_generic(&mut table, &source, 0, dst, output_directive, acceleration)
    }
}

#[inline]
fn directive_for(src_len: usize, dst_len: usize) -> LimitedOutputDirective {
    if dst_len >= compress_bound(src_len) {
        LimitedOutputDirective::NotLimited
    } else {
        LimitedOutputDirective::LimitedOutput
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public entry points
// ─────────────────────────────────────────────────────────────────────────────

/// Compress `src` into `dst` with the given `acceleration` (values below 1
/// mean 1).
///
/// Returns the number of bytes written to `dst`.
pub fn compress_fast(src: &[u8], dst: &mut [u8], acceleration: i32) -> Result<usize, Lz4Error> {
    if src.len() > LZ4_MAX_INPUT_SIZE {
        return Err(Lz4Error::InputTooLarge);
    }
    let directive = directive_for(src.len(), dst.len());
    compress_with_transient_table(src, dst, directive, acceleration).map(|(written, _)| written)
}

/// Compress `src` into `dst` with the default acceleration.
pub fn compress_default(src: &[u8], dst: &mut [u8]) -> Result<usize, Lz4Error> {
    compress_fast(src, dst, LZ4_ACCELERATION_DEFAULT)
}

/// Single-shot compression that reuses `state`'s position table instead of
/// allocating one. `state` is reset first and holds no usable history
/// afterwards.
pub fn compress_fast_ext_state(
    state: &mut Lz4Stream,
    src: &[u8],
    dst: &mut [u8],
    acceleration: i32,
) -> Result<usize, Lz4Error> {
    state.reset();
    if src.len() > LZ4_MAX_INPUT_SIZE {
        return Err(Lz4Error::InputTooLarge);
    }
    let directive = directive_for(src.len(), dst.len());
    let source = EncodeSource::single(src);
    compress_generic(state.table_mut(), &source, 0, dst, directive, acceleration)
        .map(|(written, _)| written)
}

/// Compress as much of `src` as fits in `dst`.
///
/// Returns `(consumed, written)`: the compressed block in `dst[..written]`
/// decodes to exactly `src[..consumed]`.
pub fn compress_dest_size(src: &[u8], dst: &mut [u8]) -> Result<(usize, usize), Lz4Error> {
    if dst.len() >= compress_bound(src.len()) {
        let written = compress_fast(src, dst, LZ4_ACCELERATION_DEFAULT)?;
        return Ok((src.len(), written));
    }
    let (written, consumed) = compress_with_transient_table(
        src,
        dst,
        LimitedOutputDirective::FillOutput,
        LZ4_ACCELERATION_DEFAULT,
    )?;
    Ok((consumed, written))
}

/// Compress `src` into a freshly allocated, exactly sized `Vec`.
pub fn compress_block_to_vec(src: &[u8], acceleration: i32) -> Result<Vec<u8>, Lz4Error> {
    if src.len() > LZ4_MAX_INPUT_SIZE {
        return Err(Lz4Error::InputTooLarge);
    }
    let mut dst = vec![0u8; compress_bound(src.len())];
    let written = compress_fast(src, &mut dst, acceleration)?;
    dst.truncate(written);
    Ok(dst)
}
