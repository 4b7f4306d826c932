//! Common test utilities shared across integration tests.

use std::path::Path;

use assert_cmd::Command;
use serde_json::Value;

/// A `tracereverse` command isolated to `root`, with no user config or env
/// overrides leaking in.
pub fn tr_cmd(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tracereverse").unwrap();
    cmd.env("TRACEREVERSE_ROOT", root)
        .env("TRACEREVERSE_CONFIG", root.join("config.toml"))
        .env_remove("TRACEREVERSE_USER")
        .env_remove("TRACEREVERSE_ROBOT")
        .env_remove("TRACEREVERSE_DEFAULT_SORT")
        .env_remove("TRACEREVERSE_STORAGE_BACKEND")
        .env_remove("RUST_LOG");
    cmd
}

/// Run a robot-mode command and return the `data` field of the envelope.
pub fn robot_data(root: &Path, args: &[&str]) -> Value {
    let output = tr_cmd(root).arg("--robot").args(args).output().unwrap();
    assert!(
        output.status.success(),
        "command {args:?} failed: {}",
        String::from_utf8_lossy(&output.stdout)
    );
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "ok");
    json["data"].clone()
}

pub fn slugs(results: &Value) -> Vec<String> {
    results
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["slug"].as_str().unwrap().to_string())
        .collect()
}
