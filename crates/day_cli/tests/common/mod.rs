#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("daytasks-{nanos}-{file_name}"))
}

/// Runs the binary with a config path that does not exist, so the
/// developer's own config never leaks into assertions.
pub fn run(args: &[&str]) -> Output {
    run_with_config(args, &temp_path("absent-config.json"))
}

pub fn run_with_config(args: &[&str], config_path: &PathBuf) -> Output {
    Command::new(env!("CARGO_BIN_EXE_day_tasks"))
        .args(args)
        .env("DAYTASKS_CONFIG_PATH", config_path)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run day_tasks")
}

pub fn run_session(input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_day_tasks"))
        .env("DAYTASKS_CONFIG_PATH", temp_path("absent-config.json"))
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start day_tasks session");

    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(input.as_bytes())
        .expect("failed to write session input");

    child.wait_with_output().expect("failed to wait for session")
}

pub fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

/// JSON documents printed by an interactive session, in order.
pub fn json_lines(output: &Output) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|line| line.starts_with('{') || line.starts_with('['))
        .map(|line| serde_json::from_str(line).expect("line is JSON"))
        .collect()
}
