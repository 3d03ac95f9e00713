//! Binary-level tests for `overlay-ctl pull`

use super::test_utils::{stderr, stdout, CliEnv};
use std::fs;

const CAPTURE: &str = concat!(
    "WoWXIV_initfs = {\r\n",
    "}\r\n",
    "WoWXIV_initfs_overlay = {\r\n",
    "{\r\n",
    "[\"a.lua\"] = 2,\r\n",
    "[\"sub\"] = 3,\r\n",
    "},\r\n",
    "\"hi\",\r\n",
    "{\r\n",
    "[\"b.lua\"] = 4,\r\n",
    "},\r\n",
    "\"y=3\",\r\n",
    "}\r\n",
);

#[test]
fn test_pull_reports_changed_paths_then_nothing() {
    let env = CliEnv::new();
    let workspace = env.source_root("src");
    fs::create_dir_all(workspace.join("sub")).unwrap();
    fs::write(workspace.join("sub").join("b.lua"), "y=2").unwrap();
    let captured = env.path().join("WoWXIV.lua");
    fs::write(&captured, CAPTURE).unwrap();

    let ws = workspace.to_string_lossy();
    let cap = captured.to_string_lossy();

    let first = env.run(&["--workspace", &ws, "pull", &cap]);
    assert!(first.status.success(), "stderr={}", stderr(&first));
    assert_eq!(stdout(&first), "a.lua\nsub/b.lua\n");
    assert_eq!(fs::read(workspace.join("a.lua")).unwrap(), b"hi");
    assert_eq!(fs::read(workspace.join("sub").join("b.lua")).unwrap(), b"y=3");

    let second = env.run(&["--workspace", &ws, "pull", &cap]);
    assert!(second.status.success());
    assert_eq!(stdout(&second), "(no changes found)\n");
}

#[test]
fn test_pull_json_output() {
    let env = CliEnv::new();
    let captured = env.path().join("WoWXIV.lua");
    fs::write(&captured, "WoWXIV_initfs_overlay = {\n[\"x.txt\"] = \"1\",\n}\n").unwrap();
    let ws = env.source_root("ws");

    let output = env.run(&[
        "--workspace",
        &ws.to_string_lossy(),
        "pull",
        "--format",
        "json",
        &captured.to_string_lossy(),
    ]);
    assert!(output.status.success(), "stderr={}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value, serde_json::json!({ "changed": ["x.txt"] }));
}

#[test]
fn test_pull_without_marker_exits_1() {
    let env = CliEnv::new();
    let captured = env.path().join("WoWXIV.lua");
    fs::write(&captured, "SomethingElse = {\n}\n").unwrap();
    let ws = env.source_root("ws");

    let output = env.run(&[
        "--workspace",
        &ws.to_string_lossy(),
        "pull",
        &captured.to_string_lossy(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("*** No overlay data found"));
}

#[test]
fn test_pull_malformed_overlay_exits_1_and_writes_nothing() {
    let env = CliEnv::new();
    let captured = env.path().join("WoWXIV.lua");
    fs::write(
        &captured,
        "WoWXIV_initfs_overlay = {\n{\n[\"a.lua\"] = 9,\n},\n}\n",
    )
    .unwrap();
    let ws = env.source_root("ws");

    let output = env.run(&[
        "--workspace",
        &ws.to_string_lossy(),
        "pull",
        &captured.to_string_lossy(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("slot 9"));
    assert!(!ws.join("a.lua").exists());
}

#[test]
fn test_pull_missing_argument_exits_2() {
    let env = CliEnv::new();
    let output = env.run(&["pull"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Usage"));
}

#[test]
fn test_workspace_config_selects_overlay_variable() {
    let env = CliEnv::new();
    let ws = env.source_root("ws");
    fs::write(
        ws.join("overlay-ctl.toml"),
        "[pull]\noverlay_variable = \"Custom_overlay\"\n",
    )
    .unwrap();
    let captured = env.path().join("saved.lua");
    fs::write(&captured, "Custom_overlay = {\n[\"n.txt\"] = \"v\",\n}\n").unwrap();

    let output = env.run(&[
        "--workspace",
        &ws.to_string_lossy(),
        "pull",
        &captured.to_string_lossy(),
    ]);
    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert_eq!(stdout(&output), "n.txt\n");
}

#[test]
fn test_pull_outside_source_root_exits_1_and_writes_nothing() {
    let env = CliEnv::new();
    let captured = env.path().join("WoWXIV.lua");
    fs::write(&captured, "WoWXIV_initfs_overlay = {\n[\"a.lua\"] = \"hi\",\n}\n").unwrap();
    let empty = env.path().join("elsewhere");
    fs::create_dir_all(&empty).unwrap();

    let output = env.run(&[
        "--workspace",
        &empty.to_string_lossy(),
        "pull",
        &captured.to_string_lossy(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("not an addon source root"));
    assert_eq!(fs::read_dir(&empty).unwrap().count(), 0);
}
