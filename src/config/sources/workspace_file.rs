//! Workspace config file source: <workspace>/overlay-ctl.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::{Path, PathBuf};

/// File name of the per-workspace configuration
pub const WORKSPACE_CONFIG_FILE: &str = "overlay-ctl.toml";

pub fn workspace_config_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(WORKSPACE_CONFIG_FILE)
}

/// Add the workspace config file to builder when present.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = workspace_config_path(workspace_root);
    if path.exists() {
        Ok(builder.add_source(File::from(path).required(false)))
    } else {
        Ok(builder)
    }
}
