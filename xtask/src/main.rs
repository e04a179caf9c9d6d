//! Custom cargo commands for chunklens.
//!
//! Usage:
//!   cargo xtask verify    - Run full verification suite
//!   cargo xtask test      - Run all tests
//!   cargo xtask check     - Quick check
//!   cargo xtask fuzz      - Short run of every fuzz target
//!   cargo xtask bench     - Run benchmarks

use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::process::Command;

const FUZZ_TARGETS: [&str; 3] = ["partition_tiling", "span_locator", "matrix_buckets"];

fn main() -> Result<()> {
    let task = env::args().nth(1);
    match task.as_deref() {
        Some("verify") => verify()?,
        Some("test") => test()?,
        Some("check") => check()?,
        Some("fuzz") => {
            let seconds = env::args().nth(2).unwrap_or_else(|| "30".to_string());
            fuzz(&seconds)?
        }
        Some("bench") => bench()?,
        _ => print_help(),
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        r#"
cargo xtask <COMMAND>

Commands:
  verify          Run full verification suite (markers + tests + clippy + defaults)
  test            Run all Rust tests
  check           Quick check (cargo check + test + clippy)
  fuzz [SECONDS]  Run each fuzz target for SECONDS (default 30, needs cargo-fuzz)
  bench           Run benchmarks
"#
    );
}

/// Full verification suite
fn verify() -> Result<()> {
    println!("==========================================");
    println!("chunklens Verification Suite");
    println!("==========================================\n");

    println!("[1/4] Checking contract call sites...");
    check_contract_calls()?;
    println!("✓ Contracts wired in\n");

    println!("[2/4] Running Rust tests...");
    run_cargo(&["test", "--quiet"])?;
    println!("✓ All Rust tests passed\n");

    println!("[3/4] Running clippy...");
    run_cargo(&["clippy", "--quiet", "--all-targets", "--", "-D", "warnings"])?;
    println!("✓ Clippy passed\n");

    println!("[4/4] Verifying documented defaults...");
    verify_defaults()?;
    println!("✓ Defaults aligned\n");

    println!("==========================================");
    println!("✓ ALL VERIFICATION CHECKS PASSED");
    println!("==========================================");

    Ok(())
}

/// Run all tests
fn test() -> Result<()> {
    run_cargo(&["test"])
}

/// Quick check
fn check() -> Result<()> {
    println!("Running quick checks...\n");

    println!("[1/3] cargo check...");
    run_cargo(&["check", "--all-targets"])?;

    println!("[2/3] cargo test...");
    run_cargo(&["test", "--quiet"])?;

    println!("[3/3] cargo clippy...");
    run_cargo(&["clippy", "--quiet", "--", "-D", "warnings"])?;

    println!("\n✓ Quick checks passed");
    Ok(())
}

/// Run every fuzz target for a fixed time
fn fuzz(seconds: &str) -> Result<()> {
    let fuzz_dir = project_root()?.join("fuzz");
    for (i, target) in FUZZ_TARGETS.iter().enumerate() {
        println!("[{}/{}] fuzzing {} for {}s...", i + 1, FUZZ_TARGETS.len(), target, seconds);
        let status = Command::new("cargo")
            .args(["+nightly", "fuzz", "run", target, "--"])
            .arg(format!("-max_total_time={}", seconds))
            .current_dir(&fuzz_dir)
            .status()
            .context("Failed to run cargo fuzz (is cargo-fuzz installed?)")?;
        if !status.success() {
            bail!("fuzz target {} found a failure", target);
        }
    }
    println!("\n✓ No fuzz failures");
    Ok(())
}

/// Run benchmarks
fn bench() -> Result<()> {
    run_cargo(&["bench"])
}

// ============================================================================
// Helper functions
// ============================================================================

fn project_root() -> Result<PathBuf> {
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => env::current_dir().context("Failed to read current directory")?,
    };

    // xtask is in project_root/xtask, so go up one level
    let root = manifest_dir.parent().unwrap_or(&manifest_dir);
    Ok(root.to_path_buf())
}

fn run_cargo(args: &[&str]) -> Result<()> {
    let root = project_root()?;

    let status = Command::new("cargo")
        .args(args)
        .current_dir(&root)
        .status()
        .with_context(|| format!("Failed to run cargo {:?}", args))?;

    if !status.success() {
        bail!("cargo {:?} failed", args);
    }

    Ok(())
}

/// Every producer must still call its contract before returning.
fn check_contract_calls() -> Result<()> {
    let root = project_root()?;
    let expected = [
        ("src/partition.rs", "check_partition_tiles"),
        ("src/partition.rs", "check_segments_canonical"),
        ("src/locate.rs", "check_located_monotonic"),
        ("src/overlap.rs", "check_overlaps_ordered"),
        ("src/matrix/mod.rs", "check_bucket_floors"),
    ];

    for (file, contract) in expected {
        let source = std::fs::read_to_string(root.join(file))
            .with_context(|| format!("Failed to read {}", file))?;
        let calls = source
            .lines()
            .filter(|line| line.contains(&format!("{}(", contract)))
            .count();
        if calls == 0 {
            bail!("{} no longer calls {}", file, contract);
        }
    }

    Ok(())
}

/// The JSON example in the config docs must match the real defaults.
fn verify_defaults() -> Result<()> {
    let root = project_root()?;
    let config_rs = std::fs::read_to_string(root.join("src/config.rs"))
        .context("Failed to read config.rs")?;
    let overlap_rs = std::fs::read_to_string(root.join("src/overlap.rs"))
        .context("Failed to read overlap.rs")?;
    let matrix_rs = std::fs::read_to_string(root.join("src/matrix/mod.rs"))
        .context("Failed to read matrix/mod.rs")?;

    let pairs = [
        ("high_below", &overlap_rs, "DEFAULT_HIGH_BELOW"),
        ("medium_below", &overlap_rs, "DEFAULT_MEDIUM_BELOW"),
        ("maxDisplay", &matrix_rs, "DEFAULT_MAX_DISPLAY"),
    ];
    for (doc_key, source, constant) in pairs {
        let documented = extract_doc_value(&config_rs, doc_key)
            .with_context(|| format!("config.rs docs have no {}", doc_key))?;
        let actual = extract_const(source, constant)
            .with_context(|| format!("constant {} not found", constant))?;
        if (documented - actual).abs() > f64::EPSILON {
            bail!("config docs say {}={} but {}={}", doc_key, documented, constant, actual);
        }
    }

    Ok(())
}

fn extract_doc_value(content: &str, key: &str) -> Option<f64> {
    // Look for `//! ... "key": 0.2, ...`
    let needle = format!("\"{}\":", key);
    content
        .lines()
        .filter(|line| line.trim_start().starts_with("//!"))
        .find_map(|line| {
            let rest = line.split(&needle).nth(1)?;
            rest.trim()
                .split(|c: char| c == ',' || c == '}' || c.is_whitespace())
                .next()?
                .parse()
                .ok()
        })
}

fn extract_const(content: &str, name: &str) -> Option<f64> {
    // Look for "pub const NAME: f64 = 0.2;"
    content
        .lines()
        .find(|line| line.contains(&format!("const {}:", name)))
        .and_then(|line| line.split('=').nth(1))
        .and_then(|value| value.trim().trim_end_matches(';').trim().parse().ok())
}
