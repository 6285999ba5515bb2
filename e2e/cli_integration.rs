// e2e/cli_integration.rs — CLI integration tests (Suite 04)
//
// Runs the `lz4blk` binary as a black box with std::process::Command:
// compress/decompress round trips, default output names, budgets, decode
// modes, error exits and the in-memory benchmark.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn lz4blk_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_lz4blk"))
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(lz4blk_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("LZ4BLK_ACCELERATION")
        .env_remove("LZ4BLK_NBWORKERS")
        .output()
        .expect("failed to run lz4blk")
}

/// A TempDir holding `input.txt` with ~40 KB of text.
fn make_temp_input() -> (TempDir, Vec<u8>) {
    let dir = TempDir::new().unwrap();
    let content = lz4blk::lorem::gen_buffer(40_000, 9);
    fs::write(dir.path().join("input.txt"), &content).unwrap();
    (dir, content)
}

// ── 1. Round trip with default names ─────────────────────────────────────────

#[test]
fn test_cli_compress_decompress_default_names() {
    let (dir, original) = make_temp_input();

    let out = run(dir.path(), &["compress", "input.txt"]);
    assert!(out.status.success(), "compress failed: {}", String::from_utf8_lossy(&out.stderr));
    let block = fs::read(dir.path().join("input.txt.lz4b")).unwrap();
    assert!(block.len() < original.len());

    fs::remove_file(dir.path().join("input.txt")).unwrap();
    let size = original.len().to_string();
    let out = run(dir.path(), &["decompress", "input.txt.lz4b", "--size", &size]);
    assert!(out.status.success(), "decompress failed: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read(dir.path().join("input.txt")).unwrap(), original);
}

// ── 2. Explicit output, short aliases, size suffixes ─────────────────────────

#[test]
fn test_cli_aliases_and_size_suffix() {
    let (dir, original) = make_temp_input();
    let out = run(dir.path(), &["c", "input.txt", "-o", "packed.bin", "-a", "4"]);
    assert!(out.status.success());

    let out = run(dir.path(), &["d", "packed.bin", "-o", "restored.txt", "-s", "64K"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read(dir.path().join("restored.txt")).unwrap(), original);
}

// ── 3. Fast and partial decoding ─────────────────────────────────────────────

#[test]
fn test_cli_fast_and_partial_modes() {
    let (dir, original) = make_temp_input();
    assert!(run(dir.path(), &["compress", "input.txt", "-o", "in.lz4b"]).status.success());

    let size = original.len().to_string();
    let out = run(dir.path(), &["decompress", "in.lz4b", "-o", "fast.txt", "--size", &size, "--fast"]);
    assert!(out.status.success());
    assert_eq!(fs::read(dir.path().join("fast.txt")).unwrap(), original);

    let out = run(
        dir.path(),
        &["decompress", "in.lz4b", "-o", "head.txt", "--size", &size, "--partial", "1000"],
    );
    assert!(out.status.success());
    assert_eq!(fs::read(dir.path().join("head.txt")).unwrap(), &original[..1000]);
}

// ── 4. Compression budget ────────────────────────────────────────────────────

#[test]
fn test_cli_budget_writes_decodable_prefix() {
    let (dir, original) = make_temp_input();
    let out = run(dir.path(), &["compress", "input.txt", "-o", "head.lz4b", "--budget", "2K"]);
    assert!(out.status.success());
    let block = fs::read(dir.path().join("head.lz4b")).unwrap();
    assert!(block.len() <= 2048);

    let out = run(dir.path(), &["decompress", "head.lz4b", "-o", "head.txt", "--size", "40000"]);
    assert!(out.status.success());
    let head = fs::read(dir.path().join("head.txt")).unwrap();
    assert!(!head.is_empty() && head.len() < original.len());
    assert_eq!(head, &original[..head.len()]);
}

// ── 5. Failures exit non-zero with a message ─────────────────────────────────

#[test]
fn test_cli_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let out = run(dir.path(), &["compress", "does-not-exist.txt"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("does-not-exist.txt"));
}

#[test]
fn test_cli_size_too_small_fails() {
    let (dir, _) = make_temp_input();
    assert!(run(dir.path(), &["compress", "input.txt"]).status.success());
    let out = run(dir.path(), &["decompress", "input.txt.lz4b", "-o", "x", "--size", "100"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("not a valid block"));
}

#[test]
fn test_cli_cannot_infer_output_name() {
    let (dir, _) = make_temp_input();
    let out = run(dir.path(), &["decompress", "input.txt", "--size", "10"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("-o"));
}

#[test]
fn test_cli_quiet_suppresses_errors() {
    let dir = TempDir::new().unwrap();
    let out = run(dir.path(), &["-qq", "compress", "missing.txt"]);
    assert!(!out.status.success());
    assert!(out.stderr.is_empty());
}

#[test]
fn test_cli_usage_errors() {
    let dir = TempDir::new().unwrap();
    assert!(!run(dir.path(), &[]).status.success());
    assert!(!run(dir.path(), &["decompress", "x.lz4b"]).status.success());
    assert!(!run(dir.path(), &["decompress", "x.lz4b", "-s", "1", "--fast", "--partial", "1"])
        .status
        .success());
}

// ── 6. Version and benchmark ─────────────────────────────────────────────────

#[test]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();
    let out = run(dir.path(), &["--version"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_bench_file() {
    let (dir, _) = make_temp_input();
    let out = run(dir.path(), &["bench", "-B", "8K", "-T", "2", "-i", "1", "input.txt"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stderr).contains("input.txt"));
}

#[test]
fn test_cli_bench_rejects_bad_env() {
    let (dir, _) = make_temp_input();
    let out = Command::new(lz4blk_bin())
        .args(["bench", "-i", "1", "-B", "16K", "input.txt"])
        .current_dir(dir.path())
        .env("LZ4BLK_NBWORKERS", "lots")
        .env("LZ4BLK_ACCELERATION", "-3")
        .output()
        .unwrap();
    // Bad values are reported and replaced by defaults.
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("LZ4BLK_NBWORKERS"), "{stderr}");
}
