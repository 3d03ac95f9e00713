//! Shared test utilities for integration tests
//!
//! Runs the binary with HOME and XDG directories pointed into a temp dir so a
//! developer's own configuration never leaks into a test.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Isolated environment for one CLI invocation
pub struct CliEnv {
    pub temp_dir: TempDir,
}

impl CliEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        for dir in ["home", "config", "data"] {
            std::fs::create_dir_all(temp_dir.path().join(dir)).unwrap();
        }
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create an addon source root named `name` (it has a `tools/` directory)
    pub fn source_root(&self, name: &str) -> PathBuf {
        let root = self.path().join(name);
        std::fs::create_dir_all(root.join("tools")).unwrap();
        root
    }

    /// Run overlay-ctl with `args`, isolated from the caller's configuration
    pub fn run(&self, args: &[&str]) -> Output {
        let bin = env!("CARGO_BIN_EXE_overlay-ctl");
        Command::new(bin)
            .env("HOME", self.path().join("home"))
            .env("XDG_CONFIG_HOME", self.path().join("config"))
            .env("XDG_DATA_HOME", self.path().join("data"))
            .env_remove("OVERLAY_CTL_LOG")
            .env_remove("OVERLAY_CTL_LOG_FORMAT")
            .env_remove("OVERLAY_CTL_LOG_OUTPUT")
            .args(args)
            .output()
            .unwrap()
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
