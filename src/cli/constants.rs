// cli/constants.rs — program identity and display infrastructure

use std::sync::atomic::{AtomicU32, Ordering};

// ── Identity ─────────────────────────────────────────────────────────────────
pub const PROGRAM_NAME: &str = "lz4blk";
pub const AUTHOR: &str = "lz4blk developers";

/// Render the banner shown at display level 3 and above.
pub fn welcome_message() -> String {
    format!(
        "*** {} v{} {}-bit, by {} ***\n",
        PROGRAM_NAME,
        crate::LZ4BLK_VERSION_STRING,
        usize::BITS,
        AUTHOR
    )
}

// ── Display level ────────────────────────────────────────────────────────────
//
// 0 = silent; 1 = errors only; 2 = results (default); 3 = per-block detail; 4 = debug
pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(2);

#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

/// Apply `-v` / `-q` counts to the default level, saturating at 0 and 4.
pub fn adjust_display_level(verbose: u8, quiet: u8) -> u32 {
    let level = (2 + verbose as i32 - quiet as i32).clamp(0, 4);
    set_display_level(level as u32);
    level as u32
}

// ── Display macros ───────────────────────────────────────────────────────────

/// Print to stderr.
#[macro_export]
macro_rules! display {
    ($($arg:tt)*) => { eprint!($($arg)*) };
}

/// Print to stderr when the display level is at least `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::cli::constants::display_level() >= $level {
            eprint!($($arg)*);
        }
    };
}
