//! Integration tests for the `rampart` CLI binary.
//!
//! These cover argument parsing, help output, and the offline commands
//! (validate, simulate, diff) — none of them need a running daemon.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::NamedTempFile;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `rampart` binary with env isolation.
///
/// Clears `RAMPART_*` env vars and points config directories at a
/// nonexistent path so tests never read a real settings file.
fn rampart_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("rampart");
    cmd.env("HOME", "/tmp/rampart-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/rampart-cli-test-nonexistent")
        .env_remove("RAMPART_CONFIG")
        .env_remove("RAMPART_LISTEN")
        .env_remove("RAMPART_DAEMON__ENDPOINT")
        .env_remove("RAMPART_DAEMON_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn write_config(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const VALID_CONFIG: &str = r#"{
    "interfaces": [
        {"name": "eth0", "zone": "wan", "ipv4": ["203.0.113.2/30"]},
        {"name": "eth1", "zone": "lan", "ipv4": ["192.168.1.1/24"]}
    ],
    "zones": [
        {"name": "wan", "interface": "eth0", "external": true},
        {"name": "lan", "interface": "eth1"}
    ],
    "policies": [
        {
            "name": "lan-to-wan",
            "from": "lan",
            "to": "wan",
            "action": "drop",
            "rules": [
                {"name": "Allow DNS", "action": "accept", "protocol": "udp", "dest_port": 53}
            ]
        }
    ]
}"#;

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = rampart_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    rampart_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("firewall")
            .and(predicate::str::contains("serve"))
            .and(predicate::str::contains("validate"))
            .and(predicate::str::contains("simulate"))
            .and(predicate::str::contains("diff")),
    );
}

#[test]
fn test_version_flag() {
    rampart_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rampart"));
}

#[test]
fn test_invalid_subcommand() {
    let output = rampart_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

// ── validate ────────────────────────────────────────────────────────

#[test]
fn test_validate_clean_config() {
    let file = write_config(VALID_CONFIG);
    rampart_cmd()
        .args(["validate", file.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));
}

#[test]
fn test_validate_reports_blocking_errors() {
    let file = write_config(
        r#"{
            "zones": [{"name": "lan"}],
            "policies": [{"from": "lan", "to": "dmz", "action": "accept"}]
        }"#,
    );
    let output = rampart_cmd()
        .args(["validate", file.path().to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1), "Expected exit code 1");
    let text = combined_output(&output);
    assert!(
        text.contains("unknown zone: dmz"),
        "Expected unknown-zone finding:\n{text}"
    );
}

#[test]
fn test_validate_strict_fails_on_warnings() {
    // Two policies for the same pair is a warning, not an error.
    let duplicated = r#"{
        "zones": [{"name": "lan"}, {"name": "wan"}],
        "policies": [
            {"name": "a", "from": "lan", "to": "wan", "action": "accept"},
            {"name": "b", "from": "lan", "to": "wan", "action": "drop"}
        ]
    }"#;

    let file = write_config(duplicated);
    rampart_cmd()
        .args(["validate", file.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("duplicate policy"));

    let file = write_config(duplicated);
    let output = rampart_cmd()
        .args(["validate", "--strict", file.path().to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1), "Expected exit code 1");
}

#[test]
fn test_validate_missing_file() {
    rampart_cmd()
        .args(["validate", "/nonexistent/rampart-test.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not read"));
}

#[test]
fn test_validate_malformed_json() {
    let file = write_config("{not json");
    rampart_cmd()
        .args(["validate", file.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid configuration"));
}

// ── simulate ────────────────────────────────────────────────────────

#[test]
fn test_simulate_matches_rule() {
    let file = write_config(VALID_CONFIG);
    rampart_cmd()
        .args([
            "simulate",
            file.path().to_str().unwrap(),
            "--src",
            "192.168.1.50",
            "--dst",
            "8.8.8.8",
            "--protocol",
            "udp",
            "--port",
            "53",
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""action": "accept""#)
                .and(predicate::str::contains("Allow DNS"))
                .and(predicate::str::contains(r#""src_zone": "lan""#)),
        );
}

#[test]
fn test_simulate_falls_to_default_action() {
    let file = write_config(VALID_CONFIG);
    rampart_cmd()
        .args([
            "simulate",
            file.path().to_str().unwrap(),
            "--src",
            "192.168.1.50",
            "--dst",
            "8.8.8.8",
            "--protocol",
            "tcp",
            "--port",
            "443",
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""action": "drop""#)
                .and(predicate::str::contains("default policy")),
        );
}

#[test]
fn test_simulate_rejects_bad_protocol() {
    let file = write_config(VALID_CONFIG);
    let output = rampart_cmd()
        .args([
            "simulate",
            file.path().to_str().unwrap(),
            "--src",
            "192.168.1.50",
            "--dst",
            "8.8.8.8",
            "--protocol",
            "carrier-pigeon",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage error");
}

// ── diff ────────────────────────────────────────────────────────────

#[test]
fn test_diff_identical_files() {
    let a = write_config(VALID_CONFIG);
    let b = write_config(VALID_CONFIG);
    rampart_cmd()
        .args([
            "diff",
            a.path().to_str().unwrap(),
            b.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes."));
}

#[test]
fn test_diff_shows_unified_changes() {
    let a = write_config(VALID_CONFIG);
    let b = write_config(
        r#"{
    "interfaces": [
        {"name": "eth0", "zone": "wan", "ipv4": ["203.0.113.2/30"]},
        {"name": "eth1", "zone": "lan", "ipv4": ["192.168.1.1/24"]}
    ],
    "zones": [
        {"name": "wan", "interface": "eth0", "external": true},
        {"name": "lan", "interface": "eth1"}
    ],
    "policies": [
        {
            "name": "lan-to-wan",
            "from": "lan",
            "to": "wan",
            "action": "accept",
            "rules": [
                {"name": "Allow DNS", "action": "accept", "protocol": "udp", "dest_port": 53}
            ]
        }
    ]
}"#,
    );
    rampart_cmd()
        .args([
            "diff",
            a.path().to_str().unwrap(),
            b.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--- Running")
                .and(predicate::str::contains("+++ Staged"))
                .and(predicate::str::contains(r#"-      "action": "drop""#))
                .and(predicate::str::contains(r#"+      "action": "accept""#)),
        );
}

// ── serve ───────────────────────────────────────────────────────────

#[test]
fn test_serve_unreachable_daemon_exits_with_connection_code() {
    let output = rampart_cmd()
        .args(["serve", "--daemon", "http://127.0.0.1:1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7), "Expected connection exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("rampartd"),
        "Expected daemon mention in error:\n{text}"
    );
}
