// KS10 Console - EPI Bus Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use std::path::PathBuf;
use std::process::Command;

fn root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

fn ks10() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ks10"))
}

#[test]
fn test_check_shipped_manifest() {
    let manifest = root().join("configs/ks10-console.yaml");
    let output = ks10()
        .args(["check", manifest.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_check_missing_manifest_exits_with_config_error() {
    let output = ks10()
        .args(["check", "does-not-exist.yaml"])
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_plan_json() {
    let manifest = root().join("configs/ks10-console.yaml");
    let output = ks10()
        .args(["plan", manifest.to_str().unwrap(), "--json"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Failed to parse JSON");
    assert_eq!(json["name"], "ks10-console");
    assert_eq!(json["capability"], "present");
    assert_eq!(json["epi"]["cfg"], 0x12);
    assert_eq!(json["epi"]["hb8cfg"], 0x7F0);
    assert_eq!(json["epi"]["addrmap"], 0x01);
    assert_eq!(json["window_base"], 0x6000_0000u32);
    assert!(json["faults"].as_array().unwrap().is_empty());

    let writes = json["writes"].as_array().unwrap();
    assert_eq!(writes[0]["peripheral"], "sysctl");
    assert!(writes.iter().all(|w| w["peripheral"] != "gpioa"));
}

#[test]
fn test_plan_text_defaults_to_builtin_profile() {
    let output = ks10()
        .arg("plan")
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Bridge 'ks10-console'"), "{}", stdout);
    assert!(stdout.contains("HB8CFG=0x000007f0"), "{}", stdout);
    assert!(stdout.contains("Window: 0x60000000 (256 bytes)"), "{}", stdout);
}
