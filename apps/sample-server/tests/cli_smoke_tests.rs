#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for the sample-server binary.

use std::collections::HashMap;
use std::process::{Command, Output, Stdio};
use std::time::Duration;

use tempfile::TempDir;

fn run_sample_server(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sample-server"))
        .args(args)
        .env_remove("SAMPLE__SERVER__PORT")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute sample-server")
}

fn write_config(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write config file");
    path.to_str().unwrap().to_owned()
}

#[test]
fn help_lists_subcommands_and_options() {
    let output = run_sample_server(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("run"));
    assert!(stdout.contains("check"));
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("--mock"));
}

#[test]
fn version_is_printed() {
    let output = run_sample_server(&["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("sample-server"));
}

#[test]
fn unknown_subcommand_fails() {
    let output = run_sample_server(&["invalid-command"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error"));
}

#[test]
fn missing_config_file_fails() {
    let output = run_sample_server(&["--config", "/nonexistent/config.yaml", "check"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"), "{stderr}");
}

#[test]
fn invalid_yaml_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "invalid.yaml", "invalid: yaml: content: [unclosed");

    let output = run_sample_server(&["--config", &path, "check"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("configuration"), "{stderr}");
}

#[test]
fn check_accepts_valid_config() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "valid.yaml",
        r#"
server:
  port: 18080
database:
  user: app
  password: testpass
  addr: "db:3306"
logging:
  format: text
sample:
  utc_offset: "+09:00"
"#,
    );

    let output = run_sample_server(&["--config", &path, "check"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("Configuration is valid"));
    assert!(stdout.contains("port: 18080"));
    assert!(!stdout.contains("testpass"));
}

#[test]
fn check_rejects_bad_utc_offset() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "bad.yaml", "sample:\n  utc_offset: Asia/Tokyo\n");

    let output = run_sample_server(&["--config", &path, "check"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("utc_offset"));
}

#[test]
fn print_config_is_yaml_with_cli_overrides() {
    let output = run_sample_server(&["--print-config", "--port", "9999"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: HashMap<String, serde_json::Value> =
        serde_saphyr::from_str(&stdout).expect("print-config output should be YAML");
    assert_eq!(parsed["server"]["port"], 9999);
    assert_eq!(parsed["sample"]["default_limit"], 20);
}

#[test]
fn env_overrides_config_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "env.yaml", "server:\n  port: 18081\n");

    let output = Command::new(env!("CARGO_BIN_EXE_sample-server"))
        .args(["--config", &path, "--print-config"])
        .env("SAMPLE__SERVER__PORT", "18082")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("port: 18082"));
}

#[tokio::test]
async fn mock_server_answers_until_killed() {
    let mut child = tokio::process::Command::new(env!("CARGO_BIN_EXE_sample-server"))
        .args(["--mock", "--port", "18093", "run"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .unwrap();

    let mut connected = false;
    for _ in 0..50 {
        if tokio::net::TcpStream::connect("127.0.0.1:18093").await.is_ok() {
            connected = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    child.kill().await.unwrap();
    assert!(connected, "server never accepted connections");
}
