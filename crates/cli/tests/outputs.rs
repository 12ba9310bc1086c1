use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(prefix: &str, ext: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push("uartboot-tests");
    let _ = std::fs::create_dir_all(&dir);

    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    dir.join(format!("{}-{}.{}", prefix, nonce, ext))
}

fn write_temp_file(prefix: &str, contents: &str) -> PathBuf {
    let path = temp_path(prefix, "yaml");
    std::fs::write(&path, contents).expect("Failed to write temp file");
    path
}

const RUNNER_FAILURE_EXIT: i32 = 0x80;

fn uartboot() -> Command {
    Command::new(env!("CARGO_BIN_EXE_uartboot"))
}

#[test]
fn test_cli_help() {
    let output = uartboot()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("PL011"));
    assert!(stdout.contains("--seed"));
}

#[test]
fn test_cli_default_bring_up() {
    let output = uartboot().output().expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(output.stdout, b"Hello World\n");
}

#[test]
fn test_cli_custom_message() {
    let output = uartboot()
        .args(["--instance", "uart2", "--message", "Hi"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(output.stdout, b"Hi");
}

#[test]
fn test_cli_integration_failure_exit_code() {
    let output = uartboot()
        .arg("--no-loopback")
        .output()
        .expect("Failed to execute command");

    // IntegrationTestFailed
    assert_eq!(output.status.code(), Some(5));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_cli_seeded_loopback_without_emulation() {
    let output = uartboot()
        .args(["--no-loopback", "--seed", "itop=0xAA", "--message", "ok"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(output.stdout, b"ok");
}

#[test]
fn test_cli_parity_error_after_send() {
    let output = uartboot()
        .args(["--seed", "flag=8", "--message", "x"])
        .output()
        .expect("Failed to execute command");

    // ParityError, the message still went out first
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(output.stdout, b"x");
}

#[test]
fn test_cli_rejects_mini_uart() {
    let output = uartboot()
        .args(["--instance", "uart1"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(RUNNER_FAILURE_EXIT));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not supported"));
}

#[test]
fn test_cli_bad_seed() {
    let output = uartboot()
        .args(["--seed", "nosuch=1"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[test]
fn test_cli_config_file() {
    let config = write_temp_file(
        "config",
        r#"
schema_version: "1.0"
instance: uart4
line:
  clock_hz: 48000000
  baud: 115200
message: "from config\n"
simulation:
  tx_full_polls: 5
"#,
    );

    let output = uartboot()
        .arg("--config")
        .arg(&config)
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(output.stdout, b"from config\n");

    let _ = std::fs::remove_file(&config);
}

#[test]
fn test_cli_missing_config() {
    let output = uartboot()
        .args(["--config", "non_existent_config.yaml"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(RUNNER_FAILURE_EXIT));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to open boot config"));
}

#[test]
fn test_cli_invalid_config_is_not_a_driver_error() {
    let config = write_temp_file("bad-version", "schema_version: \"2.0\"\n");

    let output = uartboot()
        .arg("--config")
        .arg(&config)
        .output()
        .expect("Failed to execute command");

    // 1 would read as ParityError
    assert_ne!(output.status.code(), Some(1));
    assert_eq!(output.status.code(), Some(RUNNER_FAILURE_EXIT));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unsupported schema_version"));

    let _ = std::fs::remove_file(&config);
}

#[test]
fn test_cli_snapshot() {
    let snapshot_path = temp_path("snapshot", "json");
    let _ = std::fs::remove_file(&snapshot_path);

    let output = uartboot()
        .args(["--message", "Hi", "--snapshot"])
        .arg(&snapshot_path)
        .output()
        .expect("Failed to execute uartboot");

    assert!(output.status.success());
    assert!(snapshot_path.exists());

    let content = std::fs::read_to_string(&snapshot_path).unwrap();
    let snapshot: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(snapshot["error_code"], 0);
    assert_eq!(snapshot["state"], "Transmitting");
    assert_eq!(snapshot["registers"]["ctrl"], 0x201);
    assert_eq!(snapshot["registers"]["ibrd"], 1);
    assert_eq!(snapshot["registers"]["fbrd"], 40);
    assert_eq!(snapshot["registers"]["itcp"], 0);
    let transmitted: Vec<u8> = snapshot["transmitted"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_u64().unwrap() as u8)
        .collect();
    assert_eq!(transmitted, b"Hi");

    let _ = std::fs::remove_file(&snapshot_path);
}

#[test]
fn test_cli_snapshot_on_failure() {
    let snapshot_path = temp_path("snapshot-fail", "json");

    let output = uartboot()
        .args(["--seed", "flag=64", "--snapshot"])
        .arg(&snapshot_path)
        .output()
        .expect("Failed to execute uartboot");

    // OverrunError
    assert_eq!(output.status.code(), Some(2));
    let content = std::fs::read_to_string(&snapshot_path).unwrap();
    let snapshot: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(snapshot["error_code"], 2);
    assert!(snapshot["state"].as_str().unwrap().starts_with("halted"));

    let _ = std::fs::remove_file(&snapshot_path);
}
