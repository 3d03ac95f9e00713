//! Binary-level tests for `overlay-ctl install` and `overlay-ctl config`

use super::test_utils::{stderr, stdout, CliEnv};
use overlay_ctl::codec::TreeDecoder;
use overlay_ctl::tree::Node;
use std::fs;

fn make_source(root: &std::path::Path) {
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::create_dir_all(root.join("tools")).unwrap();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::write(root.join("a.lua"), "x=1").unwrap();
    fs::write(root.join("img.png"), [0x89, b'P', b'N', b'G', 0xff]).unwrap();
    fs::write(root.join("sub").join("b.lua"), "y=2").unwrap();
    fs::write(root.join(".git").join("HEAD"), "ref: main").unwrap();
}

#[test]
fn test_install_writes_target() {
    let env = CliEnv::new();
    let source = env.path().join("src");
    make_source(&source);
    let target = env.path().join("AddOns").join("WoWXIV");
    fs::create_dir_all(target.parent().unwrap()).unwrap();

    let output = env.run(&[
        "--workspace",
        &source.to_string_lossy(),
        "install",
        &target.to_string_lossy(),
    ]);
    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert!(stdout(&output).contains("embedded:  2 files"));

    assert_eq!(
        fs::read(target.join("img.png")).unwrap(),
        [0x89, b'P', b'N', b'G', 0xff]
    );
    assert!(!target.join(".git").exists());

    let literal = fs::read(target.join("dev").join("initfs.lua")).unwrap();
    let tree = TreeDecoder::new("WoWXIV_initfs")
        .decode(&literal)
        .unwrap()
        .unwrap();
    assert_eq!(tree.lookup("sub/b.lua"), Some(&Node::file("y=2")));
    assert!(tree.lookup(".git").is_none());
}

#[test]
fn test_install_missing_target_exits_2() {
    let env = CliEnv::new();
    let output = env.run(&["install"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_install_outside_source_root_exits_1() {
    let env = CliEnv::new();
    let source = env.path().join("src");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("a.lua"), "x=1").unwrap();
    let target = env.path().join("out");

    let output = env.run(&[
        "--workspace",
        &source.to_string_lossy(),
        "install",
        &target.to_string_lossy(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("not an addon source root"));
    assert!(!target.exists());
}

#[test]
fn test_config_command_prints_effective_config() {
    let env = CliEnv::new();
    let ws = env.path().join("ws");
    fs::create_dir_all(&ws).unwrap();
    fs::write(ws.join("overlay-ctl.toml"), "[install]\ncompress = true\n").unwrap();

    let output = env.run(&["--workspace", &ws.to_string_lossy(), "config"]);
    assert!(output.status.success(), "stderr={}", stderr(&output));
    let parsed: toml::Value = toml::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["install"]["compress"].as_bool(), Some(true));
    assert_eq!(
        parsed["pull"]["overlay_variable"].as_str(),
        Some("WoWXIV_initfs_overlay")
    );
}

#[test]
fn test_invalid_config_exits_1() {
    let env = CliEnv::new();
    let ws = env.path().join("ws");
    fs::create_dir_all(&ws).unwrap();
    fs::write(ws.join("overlay-ctl.toml"), "[install]\ncompression_level = 42\n").unwrap();

    let output = env.run(&["--workspace", &ws.to_string_lossy(), "config"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("compression_level"));
}
