//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against a throwaway HOME.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Run a CLI command with HOME pointed at `home`. Returns (code, stdout, stderr).
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "motipet-cli", "--"])
        .args(args)
        .env("HOME", home)
        .env("MOTIPET_ENV", "dev")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

/// A three-frame sheet with `idle` and `petjaw` tags.
fn write_sheet(dir: &Path) -> PathBuf {
    let path = dir.join("cat.json");
    std::fs::write(
        &path,
        r#"{
            "frames": {
                "Cat 0.png": { "frame": {"x": 0,  "y": 0, "w": 32, "h": 32}, "duration": 100 },
                "Cat 1.png": { "frame": {"x": 32, "y": 0, "w": 32, "h": 32}, "duration": 100 },
                "Cat 2.png": { "frame": {"x": 64, "y": 0, "w": 32, "h": 32}, "duration": 100 }
            },
            "meta": {
                "size": {"w": 96, "h": 32},
                "frameTags": [
                    {"name": "idle",   "from": 0, "to": 1},
                    {"name": "petjaw", "from": 2, "to": 2}
                ]
            }
        }"#,
    )
    .unwrap();
    path
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("stdout should be JSON")
}

#[test]
fn test_level_json() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["level", "120"]);
    assert_eq!(code, 0, "level failed");

    let v = json(&stdout);
    assert_eq!(v["level"], 2);
    assert_eq!(v["current_floor"], 100);
    assert_eq!(v["next_threshold"], 250);
    assert_eq!(v["xp_into_level"], 20);
}

#[test]
fn test_readiness_json() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["readiness", "92"]);
    assert_eq!(code, 0, "readiness failed");

    let v = json(&stdout);
    assert_eq!(v["readiness_diagnosis"], "Peak");
    assert_eq!(v["pet_state"], "energetic");
    assert_eq!(v["happiness_score"], 92);
}

#[test]
fn test_readiness_level_up_lifts_happiness() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["readiness", "50", "--leveled-up"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["happiness_score"], 90);
}

#[test]
fn test_readiness_out_of_range_fails() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["readiness", "101"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"), "stderr was: {stderr}");
}

#[test]
fn test_reading_with_seed_is_reproducible() {
    let home = tempfile::tempdir().unwrap();
    let args = ["reading", "--count", "3", "--seed", "7"];
    let (code, first, _) = run_cli(home.path(), &args);
    assert_eq!(code, 0, "reading failed");
    let (_, second, _) = run_cli(home.path(), &args);
    assert_eq!(first, second);

    let v = json(&first);
    assert_eq!(v.as_array().map(Vec::len), Some(3));
}

#[test]
fn test_reading_force_level_up() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        home.path(),
        &["reading", "--score", "80", "--force-level-up", "--reason", "demo"],
    );
    assert_eq!(code, 0);

    let v = json(&stdout);
    let statuses = v.as_array().unwrap();
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[1]["level"], 2);
    assert!(statuses[1]["happiness_score"].as_u64().unwrap() >= 92);
}

#[test]
fn test_companion_measurements() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["companion", "--count", "2", "--seed", "3"]);
    assert_eq!(code, 0, "companion failed");
    assert_eq!(json(&stdout).as_array().map(Vec::len), Some(2));
}

#[test]
fn test_touch_head_tap_plays_petjaw() {
    let home = tempfile::tempdir().unwrap();
    let sheet = write_sheet(home.path());
    let (code, _, _) = run_cli(
        home.path(),
        &["config", "set", "sprite.sheet_path", sheet.to_str().unwrap()],
    );
    assert_eq!(code, 0, "config set failed");

    let (code, stdout, _) = run_cli(home.path(), &["touch", "tap", "--target", "head"]);
    assert_eq!(code, 0, "touch failed");

    let v = json(&stdout);
    let clips: Vec<_> = v
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["clip"].as_str())
        .collect();
    assert!(clips.contains(&"petjaw"), "clips were: {clips:?}");
}

#[test]
fn test_config_set_get_path() {
    let home = tempfile::tempdir().unwrap();

    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "gesture.long_press_threshold_ms"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "350");

    let (code, _, _) = run_cli(home.path(), &["config", "set", "ambient.min_delay_ms", "1000"]);
    assert_eq!(code, 0, "config set failed");
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "ambient.min_delay_ms"]);
    assert_eq!(stdout.trim(), "1000");

    let (code, stdout, _) = run_cli(home.path(), &["config", "path"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("motipet-dev"));
}

#[test]
fn test_config_rejects_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["config", "set", "ambient.nope", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_sheet_lists_tags() {
    let home = tempfile::tempdir().unwrap();
    let sheet = write_sheet(home.path());

    let (code, stdout, _) = run_cli(home.path(), &["sheet", sheet.to_str().unwrap()]);
    assert_eq!(code, 0, "sheet failed");
    let v = json(&stdout);
    assert_eq!(v["frame_count"], 3);
    assert_eq!(v["tags"][0]["name"], "idle");
    assert_eq!(v["tags"][0]["frames"], 2);
    assert_eq!(v["tags"][1]["name"], "petjaw");
}
