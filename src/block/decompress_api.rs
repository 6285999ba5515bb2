//! Public block decompression API.
//!
//!   - One-shot: `decompress_safe`, `decompress_safe_partial`, `decompress_fast`
//!   - Dictionary: `decompress_safe_using_dict`, `decompress_safe_partial_using_dict`,
//!     `decompress_fast_using_dict`, `decompress_safe_with_prefix`
//!   - Streaming decode context: [`Lz4StreamDecode`]
//!
//! Every function here is safe. Fast decoding trusts the caller about the
//! original size but still bounds-checks every access, so a corrupt block
//! surfaces as `DecompressError::CorruptInput` rather than memory damage.

use super::decompress_core::{decompress_generic, DecodeWindow, DecompressError};
use super::types::{EarlyEnd, EndCondition, LZ4_MAX_INPUT_SIZE, WINDOW_SIZE};

// ─────────────────────────────────────────────────────────────────────────────
// One-shot
// ─────────────────────────────────────────────────────────────────────────────

/// Decompress a full block with no dictionary.
///
/// `dst.len()` is the output capacity. Returns the number of bytes written.
pub fn decompress_safe(src: &[u8], dst: &mut [u8]) -> Result<usize, DecompressError> {
    let capacity = dst.len();
    decompress_generic(
        src,
        dst,
        0,
        capacity,
        EndCondition::OnInputSize,
        EarlyEnd::Full,
        DecodeWindow::none(),
    )
}

/// Decompress until `target_output_size` bytes exist, or the block ends.
///
/// At most `min(target_output_size, dst.len())` bytes are written.
pub fn decompress_safe_partial(
    src: &[u8],
    dst: &mut [u8],
    target_output_size: usize,
) -> Result<usize, DecompressError> {
    let output_size = target_output_size.min(dst.len());
    decompress_generic(
        src,
        dst,
        0,
        output_size,
        EndCondition::OnInputSize,
        EarlyEnd::Partial,
        DecodeWindow::none(),
    )
}

/// Decompress a block whose original size is exactly `dst.len()`.
///
/// Returns the number of compressed bytes read from `src`.
pub fn decompress_fast(src: &[u8], dst: &mut [u8]) -> Result<usize, DecompressError> {
    let original_size = dst.len();
    decompress_generic(
        src,
        dst,
        0,
        original_size,
        EndCondition::OnOutputSize,
        EarlyEnd::Full,
        DecodeWindow::none(),
    )
}

/// Decompress a block into a freshly allocated buffer of at most
/// `max_output` bytes, truncated to the decoded length.
pub fn decompress_block_to_vec(src: &[u8], max_output: usize) -> Result<Vec<u8>, DecompressError> {
    let mut out = vec![0u8; max_output];
    let written = decompress_safe(src, &mut out)?;
    out.truncate(written);
    Ok(out)
}

// ─────────────────────────────────────────────────────────────────────────────
// Dictionaries
// ─────────────────────────────────────────────────────────────────────────────

/// Only the last 64 KiB of a dictionary are reachable by an offset.
#[inline]
fn window_tail(dict: &[u8]) -> &[u8] {
    &dict[dict.len().saturating_sub(WINDOW_SIZE)..]
}

/// Decompress a block that was compressed against `dict`.
pub fn decompress_safe_using_dict(
    src: &[u8],
    dst: &mut [u8],
    dict: &[u8],
) -> Result<usize, DecompressError> {
    let capacity = dst.len();
    decompress_generic(
        src,
        dst,
        0,
        capacity,
        EndCondition::OnInputSize,
        EarlyEnd::Full,
        DecodeWindow::external(window_tail(dict)),
    )
}

/// Partial decode of a block that was compressed against `dict`.
pub fn decompress_safe_partial_using_dict(
    src: &[u8],
    dst: &mut [u8],
    target_output_size: usize,
    dict: &[u8],
) -> Result<usize, DecompressError> {
    let output_size = target_output_size.min(dst.len());
    decompress_generic(
        src,
        dst,
        0,
        output_size,
        EndCondition::OnInputSize,
        EarlyEnd::Partial,
        DecodeWindow::external(window_tail(dict)),
    )
}

/// Fast decode of a block that was compressed against `dict`.
///
/// `dst.len()` is the exact original size; returns compressed bytes read.
pub fn decompress_fast_using_dict(
    src: &[u8],
    dst: &mut [u8],
    dict: &[u8],
) -> Result<usize, DecompressError> {
    let original_size = dst.len();
    decompress_generic(
        src,
        dst,
        0,
        original_size,
        EndCondition::OnOutputSize,
        EarlyEnd::Full,
        DecodeWindow::external(window_tail(dict)),
    )
}

/// Decompress into `buffer[start..]`, treating `buffer[..start]` as history.
///
/// This is the in-place counterpart of a dictionary: the previous block's
/// output sits directly in front of the new one. Returns bytes written.
pub fn decompress_safe_with_prefix(
    src: &[u8],
    buffer: &mut [u8],
    start: usize,
) -> Result<usize, DecompressError> {
    let capacity = buffer.len().saturating_sub(start);
    decompress_generic(
        src,
        buffer,
        start,
        capacity,
        EndCondition::OnInputSize,
        EarlyEnd::Full,
        DecodeWindow::prefix(start.min(WINDOW_SIZE)),
    )
}

/// Minimum ring-buffer size for streaming decode into one circular buffer
/// with [`Lz4StreamDecode::decompress_continue_prefix`].
///
/// Returns `None` when `max_block_size` exceeds the largest block the
/// encoder produces.
pub fn decoder_ring_buffer_size(max_block_size: usize) -> Option<usize> {
    if max_block_size > LZ4_MAX_INPUT_SIZE {
        return None;
    }
    Some(WINDOW_SIZE + 14 + max_block_size.max(16))
}

// ─────────────────────────────────────────────────────────────────────────────
// Streaming decode context
// ─────────────────────────────────────────────────────────────────────────────

/// Where the last in-buffer decode ended, so the next call can tell whether
/// it continues in the same buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PrefixMark {
    buffer: usize,
    end: usize,
    /// Contiguous decoded bytes ending at `end`.
    len: usize,
}

/// Streaming decompression context.
///
/// Keeps a copy of the last 64 KiB of decoded output, so back-references into
/// earlier blocks resolve no matter where the caller put that output. A call
/// that fails leaves the context untouched.
#[derive(Clone, Debug, Default)]
pub struct Lz4StreamDecode {
    history: Vec<u8>,
    prefix: Option<PrefixMark>,
}

impl Lz4StreamDecode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new stream whose first block was compressed against `dict`.
    /// An empty `dict` starts a stream with no history.
    pub fn set_dict(&mut self, dict: &[u8]) {
        self.history.clear();
        self.history.extend_from_slice(window_tail(dict));
        self.prefix = None;
    }

    /// Bytes of history currently available to back-references.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Decode the next block into `dst`, a buffer separate from earlier
    /// output. Returns bytes written.
    pub fn decompress_continue(
        &mut self,
        src: &[u8],
        dst: &mut [u8],
    ) -> Result<usize, DecompressError> {
        let capacity = dst.len();
        let written = decompress_generic(
            src,
            dst,
            0,
            capacity,
            EndCondition::OnInputSize,
            EarlyEnd::Full,
            DecodeWindow::external(&self.history),
        )?;
        self.remember(&dst[..written]);
        self.prefix = Some(PrefixMark {
            buffer: dst.as_ptr() as usize,
            end: written,
            len: written,
        });
        Ok(written)
    }

    /// Decode the next block into `buffer[pos..]`.
    ///
    /// When the previous call ended at `buffer[pos]`, the bytes in front of
    /// `pos` serve directly as history (and a ring buffer may wrap by
    /// restarting at `pos == 0`). Returns bytes written.
    pub fn decompress_continue_prefix(
        &mut self,
        src: &[u8],
        buffer: &mut [u8],
        pos: usize,
    ) -> Result<usize, DecompressError> {
        if pos > buffer.len() {
            return Err(DecompressError::CorruptInput { consumed: 0 });
        }
        let mark = PrefixMark { buffer: buffer.as_ptr() as usize, end: pos, len: 0 };
        let contiguous = match self.prefix {
            Some(prev) if prev.buffer == mark.buffer && prev.end == pos => prev.len.min(pos),
            _ => 0,
        };

        let prefix_len = contiguous.min(WINDOW_SIZE);
        let ext_len = self.history.len() - prefix_len.min(self.history.len());
        let capacity = buffer.len() - pos;
        let written = decompress_generic(
            src,
            buffer,
            pos,
            capacity,
            EndCondition::OnInputSize,
            EarlyEnd::Full,
            DecodeWindow {
                prefix: prefix_len,
                ext_dict: &self.history[..ext_len],
            },
        )?;

        self.remember(&buffer[pos..pos + written]);
        self.prefix = Some(PrefixMark {
            end: pos + written,
            len: contiguous + written,
            ..mark
        });
        Ok(written)
    }

    /// Fast-decode the next block; `dst.len()` is its exact original size.
    /// Returns compressed bytes read.
    pub fn decompress_fast_continue(
        &mut self,
        src: &[u8],
        dst: &mut [u8],
    ) -> Result<usize, DecompressError> {
        let original_size = dst.len();
        let read = decompress_generic(
            src,
            dst,
            0,
            original_size,
            EndCondition::OnOutputSize,
            EarlyEnd::Full,
            DecodeWindow::external(&self.history),
        )?;
        self.remember(dst);
        self.prefix = Some(PrefixMark {
            buffer: dst.as_ptr() as usize,
            end: original_size,
            len: original_size,
        });
        Ok(read)
    }

    /// Append decoded bytes to the history, keeping the last 64 KiB.
    fn remember(&mut self, decoded: &[u8]) {
        if decoded.len() >= WINDOW_SIZE {
            self.history.clear();
            self.history.extend_from_slice(window_tail(decoded));
            return;
        }
        let overflow = (self.history.len() + decoded.len()).saturating_sub(WINDOW_SIZE);
        self.history.drain(..overflow);
        self.history.extend_from_slice(decoded);
    }
}
