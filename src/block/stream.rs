//! Streaming block compression.
//!
//! A [`Lz4Stream`] carries a position table and up to 64 KiB of history from
//! one call to the next, so each block may reference the data compressed
//! before it. Blocks are still independent on the wire: the decoder needs the
//! same history, supplied through `Lz4StreamDecode` or a dictionary.
//!
//! # Modes
//! - [`Lz4Stream::compress_continue`]: each input lives in its own buffer.
//!   History comes from the copy the context keeps (external dictionary).
//! - [`Lz4Stream::compress_continue_prefix`]: inputs are laid out back to
//!   back in one buffer; when a call starts exactly where the previous one
//!   ended, the bytes in front of it are referenced in place. Otherwise the
//!   call falls back to the external-dictionary path.
//!
//! Positions in the table are logical: the count of bytes the context has
//! seen, not addresses. The counter is renormalized before it could pass
//! `0x8000_0000`.

use super::compress::{compress_bound, compress_generic, EncodeSource, Lz4Error, Window};
use super::table::PositionTable;
use super::types::{LimitedOutputDirective, GB, HASH_UNIT, KB, LZ4_MAX_INPUT_SIZE, WINDOW_SIZE};

/// Counter value past which the table is rebased.
const RENORM_THRESHOLD: usize = 0x8000_0000;

/// Dictionary positions are sampled every this many bytes by [`Lz4Stream::load_dict`].
const DICT_HASH_STEP: usize = 3;

/// End of the last input that lived inside a caller buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PrefixMark {
    buffer: usize,
    end: usize,
    /// Bytes of this stream that sit contiguously in front of `end`.
    len: usize,
}

/// Streaming compression context.
#[derive(Clone)]
pub struct Lz4Stream {
    pub(crate) table: PositionTable<u32>,
    /// Logical position of the next input byte.
    pub(crate) current_offset: u32,
    /// The last (at most 64 KiB) bytes seen: dictionary and earlier inputs.
    pub(crate) window: Vec<u8>,
    prefix_mark: Option<PrefixMark>,
    initialized: bool,
}

impl Lz4Stream {
    /// A fresh context in the reset state.
    pub fn new() -> Self {
        Lz4Stream {
            table: PositionTable::new(),
            current_offset: 0,
            window: Vec::with_capacity(WINDOW_SIZE),
            prefix_mark: None,
            initialized: true,
        }
    }

    /// Forget all history and return to the reset state.
    pub fn reset(&mut self) {
        self.table.clear();
        self.current_offset = 0;
        self.window.clear();
        self.prefix_mark = None;
        self.initialized = true;
    }

    /// `false` after a failed compression step, until [`reset`](Self::reset).
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Bytes of history currently available to the next call.
    pub fn dict_size(&self) -> usize {
        self.window.len()
    }

    pub(crate) fn table_mut(&mut self) -> &mut PositionTable<u32> {
        &mut self.table
    }

    // ── Dictionary ───────────────────────────────────────────────────────────

    /// Use `dictionary` as the history for the next block.
    ///
    /// Only the last 64 KiB are kept. Dictionaries shorter than 8 bytes are
    /// ignored and leave the context without history. Returns the number of
    /// dictionary bytes retained.
    pub fn load_dict(&mut self, dictionary: &[u8]) -> usize {
        if !self.initialized || self.current_offset as usize > GB {
            self.reset();
        }
        self.prefix_mark = None;

        if dictionary.len() < HASH_UNIT {
            self.window.clear();
            return 0;
        }

        let dict = &dictionary[dictionary.len().saturating_sub(WINDOW_SIZE)..];
        self.current_offset += (64 * KB) as u32;
        let base = self.current_offset as usize;

        let mut p = 0usize;
        while p + HASH_UNIT <= dict.len() {
            self.table.insert(dict, p, base + p);
            p += DICT_HASH_STEP;
        }

        self.window.clear();
        self.window.extend_from_slice(dict);
        self.current_offset += dict.len() as u32;
        dict.len()
    }

    /// Copy the current history into `safe_buffer` so the caller may reuse
    /// the memory it came from.
    ///
    /// Saves the last `min(64 KiB, safe_buffer.len(), history)` bytes and
    /// shrinks the history to them. A following
    /// [`compress_continue_prefix`](Self::compress_continue_prefix) on
    /// `safe_buffer` at the returned position continues in place.
    pub fn save_dict(&mut self, safe_buffer: &mut [u8]) -> usize {
        let saved = self.window.len().min(safe_buffer.len()).min(WINDOW_SIZE);
        let from = self.window.len() - saved;
        safe_buffer[..saved].copy_from_slice(&self.window[from..]);
        self.window.drain(..from);
        self.prefix_mark = Some(PrefixMark {
            buffer: safe_buffer.as_ptr() as usize,
            end: saved,
            len: saved,
        });
        saved
    }

    // ── Renormalization ──────────────────────────────────────────────────────

    /// Rebase the table if compressing `next_size` more bytes would push the
    /// counter past `0x8000_0000`.
    pub fn renorm_dict(&mut self, next_size: usize) {
        if self.current_offset as usize + next_size <= RENORM_THRESHOLD {
            return;
        }
        let delta = self.current_offset.saturating_sub(WINDOW_SIZE as u32);
        self.table.rebase(delta);
        self.current_offset = WINDOW_SIZE as u32;
        let excess = self.window.len().saturating_sub(WINDOW_SIZE);
        self.window.drain(..excess);
    }

    // ── Compression ──────────────────────────────────────────────────────────

    fn ready(&self, input_size: usize) -> Result<(), Lz4Error> {
        if !self.initialized {
            return Err(Lz4Error::UninitializedContext);
        }
        if input_size > LZ4_MAX_INPUT_SIZE {
            return Err(Lz4Error::InputTooLarge);
        }
        Ok(())
    }

    /// Compress `src`, a buffer separate from earlier inputs.
    ///
    /// Matches may reach back into the previous input or loaded dictionary.
    /// Returns bytes written to `dst`.
    pub fn compress_continue(
        &mut self,
        src: &[u8],
        dst: &mut [u8],
        acceleration: i32,
    ) -> Result<usize, Lz4Error> {
        self.ready(src.len())?;
        self.renorm_dict(src.len());

        let source = EncodeSource {
            data: src,
            start: 0,
            window: Window::External(&self.window),
        };
        let result = compress_generic(
            &mut self.table,
            &source,
            self.current_offset as usize,
            dst,
            output_directive(src.len(), dst.len()),
            acceleration,
        );
        let written = self.settle(result)?;

        self.record(src);
        self.prefix_mark = Some(PrefixMark {
            buffer: src.as_ptr() as usize,
            end: src.len(),
            len: src.len(),
        });
        Ok(written)
    }

    /// Compress `buffer[start..]`.
    ///
    /// If the previous call ended at `buffer[start]`, the input before
    /// `start` is referenced in place (prefix mode); otherwise this behaves
    /// like [`compress_continue`](Self::compress_continue) on
    /// `buffer[start..]`. Returns bytes written to `dst`, or
    /// [`Lz4Error::StartOutOfBounds`] if `start > buffer.len()`.
    pub fn compress_continue_prefix(
        &mut self,
        buffer: &[u8],
        start: usize,
        dst: &mut [u8],
        acceleration: i32,
    ) -> Result<usize, Lz4Error> {
        if start > buffer.len() {
            return Err(Lz4Error::StartOutOfBounds { start, len: buffer.len() });
        }
        let input_size = buffer.len() - start;
        self.ready(input_size)?;
        self.renorm_dict(input_size);

        let address = buffer.as_ptr() as usize;
        let contiguous = match self.prefix_mark {
            Some(mark) if mark.buffer == address && mark.end == start => mark.len.min(start),
            _ => 0,
        };
        let prefix_len = contiguous.min(self.window.len());

        let window = if prefix_len > 0 {
            Window::Prefix(prefix_len)
        } else {
            Window::External(&self.window)
        };
        let source = EncodeSource { data: buffer, start, window };
        let result = compress_generic(
            &mut self.table,
            &source,
            self.current_offset as usize,
            dst,
            output_directive(input_size, dst.len()),
            acceleration,
        );
        let written = self.settle(result)?;

        self.record(&buffer[start..]);
        self.prefix_mark = Some(PrefixMark {
            buffer: address,
            end: buffer.len(),
            len: contiguous + input_size,
        });
        Ok(written)
    }

    /// Poison the context on failure; its table already saw part of the input.
    fn settle(&mut self, result: Result<(usize, usize), Lz4Error>) -> Result<usize, Lz4Error> {
        match result {
            Ok((written, _)) => Ok(written),
            Err(err) => {
                self.initialized = false;
                self.prefix_mark = None;
                Err(err)
            }
        }
    }

    /// Append a processed input to the history and advance the counter.
    fn record(&mut self, input: &[u8]) {
        if input.len() >= WINDOW_SIZE {
            self.window.clear();
            self.window.extend_from_slice(&input[input.len() - WINDOW_SIZE..]);
        } else {
            let overflow = (self.window.len() + input.len()).saturating_sub(WINDOW_SIZE);
            self.window.drain(..overflow);
            self.window.extend_from_slice(input);
        }
        self.current_offset += input.len() as u32;
    }
}

impl Default for Lz4Stream {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn output_directive(input_size: usize, capacity: usize) -> LimitedOutputDirective {
    if capacity >= compress_bound(input_size) {
        LimitedOutputDirective::NotLimited
    } else {
        LimitedOutputDirective::LimitedOutput
    }
}
