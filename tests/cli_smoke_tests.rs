//! CLI smoke tests - verify basic command-line interface functionality
//!
//! These tests run the actual compiled binary to ensure:
//! - Help and version flags work
//! - Commands parse correctly
//! - Operator commands fail cleanly without a daemon

use std::process::Command;
use tempfile::TempDir;

/// Helper to get the path to the compiled tickerd binary
fn tickerd_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tickerd"))
}

#[test]
fn cli_help_works() {
    let output = tickerd_bin()
        .arg("--help")
        .output()
        .expect("Failed to run tickerd --help");

    assert!(
        output.status.success(),
        "tickerd --help should exit successfully"
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"), "Help should show usage");
    assert!(stdout.contains("daemon"), "Help should list daemon command");
    assert!(stdout.contains("breaking"), "Help should list breaking command");
    assert!(stdout.contains("disaster"), "Help should list disaster command");
}

#[test]
fn cli_version_works() {
    let output = tickerd_bin()
        .arg("--version")
        .output()
        .expect("Failed to run tickerd --version");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tickerd"), "Version should name the binary");
}

#[test]
fn cli_rejects_unknown_subcommand() {
    let output = tickerd_bin()
        .arg("frobnicate")
        .output()
        .expect("Failed to run tickerd frobnicate");

    assert!(!output.status.success(), "Unknown subcommand should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("frobnicate") || stderr.contains("unrecognized"),
        "Error should mention the bad subcommand"
    );
}

#[test]
fn cli_disaster_requires_arguments() {
    let output = tickerd_bin()
        .arg("disaster")
        .output()
        .expect("Failed to run tickerd disaster");

    assert!(!output.status.success(), "Missing arguments should fail");
}

#[test]
fn cli_validate_creates_and_accepts_default_config() {
    let temp = TempDir::new().expect("temp dir");
    let output = tickerd_bin()
        .arg("validate")
        .env("XDG_CONFIG_HOME", temp.path())
        .output()
        .expect("Failed to run tickerd validate");

    assert!(
        output.status.success(),
        "validate should pass on the generated default config: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration valid"));
    assert!(temp.path().join("tickerd/config.toml").exists());
}

#[test]
fn cli_status_fails_cleanly_without_daemon() {
    let runtime = TempDir::new().expect("temp dir");
    let output = tickerd_bin()
        .arg("status")
        // Point the socket somewhere no daemon listens
        .env("XDG_RUNTIME_DIR", runtime.path())
        .output()
        .expect("Failed to run tickerd status");

    assert!(!output.status.success(), "status without a daemon should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("daemon"),
        "Error should hint at the missing daemon, got: {stderr}"
    );
}
