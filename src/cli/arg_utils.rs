//! Argument parsing utilities shared by the clap definitions and the
//! environment readers.

/// Parses an unsigned integer from the start of `s`, optionally followed by
/// a size suffix. Returns `None` if no leading digit is present or the value
/// overflows, or `Some((value, remainder))` with the unconsumed rest of `s`.
///
/// Recognised suffixes (case-sensitive):
///   `K` / `KB` / `KiB`  → multiply by 1 024
///   `M` / `MB` / `MiB`  → multiply by 1 048 576
///   `G` / `GB` / `GiB`  → multiply by 1 073 741 824
pub fn read_size_prefix(s: &str) -> Option<(usize, &str)> {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let mut value: usize = s[..digits].parse().ok()?;
    let mut rest = &s[digits..];

    let shift = match rest.as_bytes().first() {
        Some(b'K') => 10,
        Some(b'M') => 20,
        Some(b'G') => 30,
        _ => 0,
    };
    if shift > 0 {
        value = value.checked_mul(1usize << shift)?;
        rest = &rest[1..];
        rest = rest.strip_prefix('i').unwrap_or(rest);
        rest = rest.strip_prefix('B').unwrap_or(rest);
    }
    Some((value, rest))
}

/// Parses a whole string as a size (`"64K"`, `"4MiB"`, `"1000"`).
///
/// Used as a clap `value_parser`; trailing garbage is an error.
pub fn parse_size(s: &str) -> Result<usize, String> {
    match read_size_prefix(s) {
        Some((value, "")) => Ok(value),
        Some((_, rest)) => Err(format!("unexpected trailing characters `{rest}` in size `{s}`")),
        None => Err(format!("`{s}` is not a valid size")),
    }
}

/// Output name for `compress`: `input` plus `extension`.
pub fn compressed_name(input: &str, extension: &str) -> String {
    format!("{input}{extension}")
}

/// Output name for `decompress`: `input` without `extension`, or `None` when
/// `input` does not carry it.
pub fn decompressed_name<'a>(input: &'a str, extension: &str) -> Option<&'a str> {
    input.strip_suffix(extension).filter(|stem| !stem.is_empty())
}
