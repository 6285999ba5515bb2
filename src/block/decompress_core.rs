//! Block decompression engine.
//!
//!   - `read_variable_length` — bounded continuation-byte decoder
//!   - `decompress_generic`   — the token state machine behind every decode entry point
//!
//! # Security boundary
//!
//! This is the path that sees untrusted bytes. Every read is checked against
//! the input slice and every write against the output limit before it
//! happens. Malformed or truncated input returns
//! `Err(DecompressError::CorruptInput { .. })` and never panics.

use thiserror::Error;

use super::types::{
    copy_match, copy_overlapping, read_le16, EarlyEnd, EndCondition, LASTLITERALS,
    MATCH_SAFEGUARD_DISTANCE, MFLIMIT, MINMATCH, ML_BITS, ML_MASK, RUN_MASK, WILDCOPYLENGTH,
};

// ─────────────────────────────────────────────────────────────────────────────
// Error type
// ─────────────────────────────────────────────────────────────────────────────

/// Errors returned by block decompression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecompressError {
    /// The block is malformed, truncated, references bytes outside the
    /// available window, or does not fit the supplied output.
    #[error("corrupt block: decoding failed after {consumed} input bytes")]
    CorruptInput {
        /// Input bytes read before the failure was detected.
        consumed: usize,
    },
}

impl DecompressError {
    /// The classic integer encoding of this error: `-(consumed) - 1`.
    pub fn sentinel(&self) -> i64 {
        match *self {
            DecompressError::CorruptInput { consumed } => -(consumed as i64) - 1,
        }
    }

    /// Input bytes read before the failure.
    pub fn consumed(&self) -> usize {
        match *self {
            DecompressError::CorruptInput { consumed } => consumed,
        }
    }
}

#[inline(always)]
fn corrupt<T>(consumed: usize) -> Result<T, DecompressError> {
    Err(DecompressError::CorruptInput { consumed })
}

// ─────────────────────────────────────────────────────────────────────────────
// Window
// ─────────────────────────────────────────────────────────────────────────────

/// History available to back-references, in front of the output start.
#[derive(Clone, Copy, Debug, Default)]
pub struct DecodeWindow<'d> {
    /// Bytes of already-decoded data directly before the output start, in the
    /// same buffer.
    pub prefix: usize,
    /// Older history in a separate buffer; its last byte precedes the prefix.
    pub ext_dict: &'d [u8],
}

impl<'d> DecodeWindow<'d> {
    pub const fn none() -> Self {
        DecodeWindow { prefix: 0, ext_dict: &[] }
    }

    pub const fn prefix(len: usize) -> Self {
        DecodeWindow { prefix: len, ext_dict: &[] }
    }

    pub const fn external(dict: &'d [u8]) -> Self {
        DecodeWindow { prefix: 0, ext_dict: dict }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// read_variable_length
// ─────────────────────────────────────────────────────────────────────────────

/// Sum continuation bytes starting at `src[*ip]` until one is below 255.
///
/// With `initial_check`, fails if `*ip >= ilimit` before the first read; after
/// each byte, fails if the cursor moved past `ilimit`. Reading past the end of
/// `src` is always a failure.
#[inline(always)]
fn read_variable_length(
    src: &[u8],
    ip: &mut usize,
    ilimit: usize,
    initial_check: bool,
) -> Result<usize, DecompressError> {
    if initial_check && *ip >= ilimit {
        return corrupt(*ip);
    }
    let mut length = 0usize;
    loop {
        let Some(&s) = src.get(*ip) else {
            return corrupt(*ip);
        };
        *ip += 1;
        length += s as usize;
        if *ip > ilimit {
            return corrupt(*ip);
        }
        if s != 255 {
            return Ok(length);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// decompress_generic
// ─────────────────────────────────────────────────────────────────────────────

/// Decode the block in `src` into `dst[dst_start..dst_start + output_size]`.
///
/// | Parameter       | Meaning                                                    |
/// |-----------------|------------------------------------------------------------|
/// | `dst_start`     | Output cursor start; `dst[..dst_start]` may hold a prefix  |
/// | `output_size`   | Output capacity (safe), exact size (fast), target (partial)|
/// | `end`           | Safe ([`EndCondition::OnInputSize`]) or fast decoding       |
/// | `early`         | Full block or partial decode                               |
/// | `window`        | Prefix length and external dictionary                      |
///
/// Returns bytes written in safe mode and input bytes read in fast mode.
pub fn decompress_generic(
    src: &[u8],
    dst: &mut [u8],
    dst_start: usize,
    output_size: usize,
    end: EndCondition,
    early: EarlyEnd,
    window: DecodeWindow<'_>,
) -> Result<usize, DecompressError> {
    let safe = end == EndCondition::OnInputSize;
    let partial = early == EarlyEnd::Partial;

    let iend = src.len();
    let oend = match dst_start.checked_add(output_size) {
        Some(oend) if oend <= dst.len() && window.prefix <= dst_start => oend,
        _ => return corrupt(0),
    };
    let low_prefix = dst_start - window.prefix;
    let ext_dict = window.ext_dict;

    // ── Empty-output special cases ───────────────────────────────────────────
    if output_size == 0 {
        if safe {
            if partial {
                return Ok(0);
            }
            return if src == [0] { Ok(0) } else { corrupt(0) };
        }
        return if src.first() == Some(&0) { Ok(1) } else { corrupt(0) };
    }
    if src.is_empty() {
        return corrupt(0);
    }

    let (lit_ilimit, match_ilimit) = if safe {
        (iend.saturating_sub(RUN_MASK), (iend + 1).saturating_sub(LASTLITERALS))
    } else {
        (iend, iend)
    };

    let mut ip = 0usize;
    let mut op = dst_start;

    loop {
        // ── Token ────────────────────────────────────────────────────────────
        let Some(&token) = src.get(ip) else {
            return corrupt(ip);
        };
        ip += 1;

        // ── Literals ─────────────────────────────────────────────────────────
        let mut length = (token >> ML_BITS) as usize;
        if length == RUN_MASK {
            length += read_variable_length(src, &mut ip, lit_ilimit, true)?;
        }
        let cpy = op + length;
        let lit_end = ip + length;

        if safe {
            let near_out_end = cpy > oend.saturating_sub(MFLIMIT);
            let near_in_end = lit_end > iend.saturating_sub(2 + 1 + LASTLITERALS);
            if near_out_end || near_in_end {
                if partial {
                    let length = length.min(iend - ip).min(oend - op);
                    dst[op..op + length].copy_from_slice(&src[ip..ip + length]);
                    ip += length;
                    op += length;
                    if op == oend || ip + 2 >= iend {
                        break;
                    }
                } else {
                    // Last literal run: it must end the input exactly and fit.
                    if lit_end != iend || cpy > oend {
                        return corrupt(ip);
                    }
                    dst[op..cpy].copy_from_slice(&src[ip..lit_end]);
                    op = cpy;
                    break;
                }
            } else {
                dst[op..cpy].copy_from_slice(&src[ip..lit_end]);
                ip = lit_end;
                op = cpy;
            }
        } else {
            if lit_end > iend {
                return corrupt(ip);
            }
            if cpy > oend.saturating_sub(WILDCOPYLENGTH) {
                // Fast decoding ends exactly at the original size.
                if cpy != oend {
                    return corrupt(ip);
                }
                dst[op..cpy].copy_from_slice(&src[ip..lit_end]);
                ip = lit_end;
                op = cpy;
                break;
            }
            dst[op..cpy].copy_from_slice(&src[ip..lit_end]);
            ip = lit_end;
            op = cpy;
        }

        // ── Offset ───────────────────────────────────────────────────────────
        if ip + 2 > iend {
            return corrupt(ip);
        }
        let offset = read_le16(src, ip) as usize;
        ip += 2;

        let in_prefix = op - low_prefix;
        if offset == 0 || offset > in_prefix + ext_dict.len() {
            return corrupt(ip);
        }

        // ── Match length ─────────────────────────────────────────────────────
        let mut length = (token & ML_MASK as u8) as usize;
        if length == ML_MASK {
            length += read_variable_length(src, &mut ip, match_ilimit, false)?;
        }
        length += MINMATCH;

        // ── Match from the external dictionary ───────────────────────────────
        if offset > in_prefix {
            if op + length + LASTLITERALS > oend {
                if !partial {
                    return corrupt(ip);
                }
                length = length.min(oend - op);
            }
            let back = offset - in_prefix;
            let dict_pos = ext_dict.len() - back;
            if length <= back {
                dst[op..op + length].copy_from_slice(&ext_dict[dict_pos..dict_pos + length]);
                op += length;
            } else {
                // Split: window tail first, then the rest from the prefix start.
                dst[op..op + back].copy_from_slice(&ext_dict[dict_pos..]);
                op += back;
                let rest = length - back;
                copy_overlapping(dst, low_prefix, op, rest);
                op += rest;
            }
            if partial && op == oend {
                break;
            }
            continue;
        }

        // ── Match within the output ──────────────────────────────────────────
        let cpy = op + length;
        if partial && cpy > oend.saturating_sub(MATCH_SAFEGUARD_DISTANCE) {
            let mlen = length.min(oend - op);
            copy_match(dst, op, offset, mlen);
            op += mlen;
            if op == oend {
                break;
            }
            continue;
        }
        if cpy + LASTLITERALS > oend {
            return corrupt(ip);
        }
        copy_match(dst, op, offset, length);
        op = cpy;
    }

    if safe {
        Ok(op - dst_start)
    } else {
        Ok(ip)
    }
}
