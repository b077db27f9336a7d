//! Command line behavior of the cw binary
//!
//! Covers the paths that finish without a working display: argument errors,
//! which exit before connecting, and a display that cannot be reached.

use std::process::{Command, Output};

fn cw(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cw"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run cw")
}

#[test]
fn too_many_arguments_prints_usage() {
    let output = cw(&["fff", "000"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr, "Usage: cw [color]\n");
    assert!(output.stdout.is_empty());
}

#[test]
fn invalid_hex_color_is_rejected() {
    let output = cw(&["zzz"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr, "Invalid color: zzz\n");
}

#[test]
fn invalid_length_color_is_rejected() {
    let output = cw(&["#12345"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr, "Invalid color: #12345\n");
}

#[test]
fn unreachable_display_exits_nonzero() {
    let output = Command::new(env!("CARGO_BIN_EXE_cw"))
        .arg("#ff0000")
        .env("DISPLAY", ":4242")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run cw");

    assert_eq!(output.status.code(), Some(1));
    assert!(!output.stderr.is_empty());
}
