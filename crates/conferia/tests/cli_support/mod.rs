//! Shared helpers for CLI integration tests.

use serde::de::DeserializeOwned;
use std::process::{Command, Output};

/// Run the conferia binary with the given args and environment.
pub fn run_cli(args: &[&str], envs: &[(&str, &str)]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_conferia"))
        .args(args)
        .envs(envs.iter().map(|(k, v)| (k.to_string(), v.to_string())))
        .output()
        .expect("run conferia binary")
}

pub fn assert_cli_success(output: &Output, args: &[&str]) {
    assert!(
        output.status.success(),
        "conferia {:?} failed\nstdout: {}\nstderr: {}",
        args,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

pub fn assert_cli_failure(output: &Output, args: &[&str]) {
    assert!(
        !output.status.success(),
        "conferia {:?} unexpectedly succeeded\nstdout: {}",
        args,
        String::from_utf8_lossy(&output.stdout)
    );
}

/// Run the binary and parse its stdout as JSON.
pub fn run_cli_json<T: DeserializeOwned>(args: &[&str], envs: &[(&str, &str)]) -> T {
    let output = run_cli(args, envs);
    assert_cli_success(&output, args);
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("invalid JSON from {:?}: {}\n{}", args, e, stdout))
}
