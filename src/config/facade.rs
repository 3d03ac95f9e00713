//! Configuration loading facade: the only entry point the CLI uses.

use super::merge::merge_policy;
use super::sources::{global_file, workspace_file};
use super::OverlayConfig;
use crate::error::ApiError;
use config::{Config, Environment, File};
use std::path::Path;
use tracing::debug;

/// Prefix for environment overrides, e.g. `OVERLAY_CTL__PULL__OVERLAY_VARIABLE`
pub const ENV_PREFIX: &str = "OVERLAY_CTL";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (lowest to highest): defaults, global file, workspace file,
    /// environment.
    pub fn load(workspace_root: &Path) -> Result<OverlayConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let config = builder.add_source(env_source()).build()?;
        Self::finish(config)
    }

    /// Load configuration from an explicit file, skipping the global and
    /// workspace files.
    pub fn load_from_file(path: &Path) -> Result<OverlayConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        let config = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()))
            .add_source(env_source())
            .build()?;
        Self::finish(config)
    }

    fn finish(config: Config) -> Result<OverlayConfig, ApiError> {
        let config: OverlayConfig = config.try_deserialize()?;
        config.validate().map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                msgs.join("\n")
            ))
        })?;
        debug!(?config, "Loaded configuration");
        Ok(config)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__")
}
