//! Configuration System
//!
//! Layered configuration for scanning, install output, pull behavior and
//! logging. Sources are merged by [`ConfigLoader`]; every value has a default
//! so the tool runs without any configuration file.

use crate::compress::DEFAULT_LEVEL;
use crate::logging::{validate_logging_config, LoggingConfig};
use crate::reconcile::NewlinePolicy;
use crate::tree::ScanRules;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::{ConfigLoader, ENV_PREFIX};
pub use sources::workspace_file::WORKSPACE_CONFIG_FILE;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Which source files are embedded and which are copied
    #[serde(default)]
    pub scan: ScanRules,

    /// Install output settings
    #[serde(default)]
    pub install: InstallConfig,

    /// Pull settings
    #[serde(default)]
    pub pull: PullConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for `install`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallConfig {
    /// Compress embedded file contents with zlib
    #[serde(default)]
    pub compress: bool,

    /// zlib level, 1 (fastest) to 9 (smallest)
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,

    /// Path of the generated data file, relative to the install target
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Global variable the generated data file assigns
    #[serde(default = "default_data_variable")]
    pub data_variable: String,
}

fn default_compression_level() -> u32 {
    DEFAULT_LEVEL
}

fn default_data_file() -> PathBuf {
    PathBuf::from("dev/initfs.lua")
}

fn default_data_variable() -> String {
    "WoWXIV_initfs".to_string()
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            compress: false,
            compression_level: default_compression_level(),
            data_file: default_data_file(),
            data_variable: default_data_variable(),
        }
    }
}

/// Settings for `pull`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullConfig {
    /// Variable whose table holds the captured overlay
    #[serde(default = "default_overlay_variable")]
    pub overlay_variable: String,

    /// Line-ending treatment when comparing against files on disk
    #[serde(default)]
    pub newline_policy: NewlinePolicy,
}

fn default_overlay_variable() -> String {
    "WoWXIV_initfs_overlay".to_string()
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            overlay_variable: default_overlay_variable(),
            newline_policy: NewlinePolicy::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Scan(String),
    Install(String),
    Pull(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Scan(msg) => write!(f, "scan: {}", msg),
            ValidationError::Install(msg) => write!(f, "install: {}", msg),
            ValidationError::Pull(msg) => write!(f, "pull: {}", msg),
            ValidationError::Logging(msg) => write!(f, "logging: {}", msg),
        }
    }
}

impl OverlayConfig {
    /// Validate the whole configuration, collecting every problem
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.scan.vcs_dir.is_empty() || self.scan.vcs_dir.contains('/') {
            errors.push(ValidationError::Scan(
                "vcs_dir must be a single non-empty name".to_string(),
            ));
        }
        if self.scan.tools_dir.is_empty() || self.scan.tools_dir.contains('/') {
            errors.push(ValidationError::Scan(
                "tools_dir must be a single non-empty name".to_string(),
            ));
        }
        for ext in self
            .scan
            .unembedded_extensions
            .iter()
            .chain(&self.scan.uncopied_extensions)
        {
            if ext.is_empty() || ext.contains(['.', '/']) {
                errors.push(ValidationError::Scan(format!(
                    "extension '{}' must be non-empty and given without a dot",
                    ext
                )));
            }
        }

        if !(1..=9).contains(&self.install.compression_level) {
            errors.push(ValidationError::Install(format!(
                "compression_level {} is outside 1..=9",
                self.install.compression_level
            )));
        }
        if self.install.data_file.as_os_str().is_empty() || self.install.data_file.is_absolute() {
            errors.push(ValidationError::Install(
                "data_file must be a relative path".to_string(),
            ));
        }
        if !is_identifier(&self.install.data_variable) {
            errors.push(ValidationError::Install(format!(
                "data_variable '{}' is not a valid identifier",
                self.install.data_variable
            )));
        }

        if !is_identifier(&self.pull.overlay_variable) {
            errors.push(ValidationError::Pull(format!(
                "overlay_variable '{}' is not a valid identifier",
                self.pull.overlay_variable
            )));
        }

        if let Err(msg) = validate_logging_config(&self.logging) {
            errors.push(ValidationError::Logging(msg));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// ASCII letter or underscore, then letters, digits and underscores
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
