//! CLI route: single route table and run context. Dispatches to the pipelines and presentation.

use crate::cli::help::command_name;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_config_toml, format_install_json, format_install_text, format_pull_json,
    format_pull_text,
};
use crate::config::{ConfigLoader, OverlayConfig};
use crate::error::ApiError;
use crate::install::Installer;
use crate::pull::Puller;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, info_span};

/// Runtime context for CLI execution: source tree root and effective configuration.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    workspace_root: PathBuf,
    config: OverlayConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        let workspace_root =
            dunce::canonicalize(&workspace_root).map_err(|e| ApiError::io(&workspace_root, e))?;
        Ok(Self::with_config(workspace_root, config))
    }

    /// Create run context from an already loaded configuration.
    pub fn with_config(workspace_root: PathBuf, config: OverlayConfig) -> Self {
        Self {
            workspace_root,
            config,
        }
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// The workspace root, checked to be an addon source tree.
    ///
    /// A source root carries the tools directory at its top level; install
    /// and pull refuse to read or write anywhere else.
    pub fn source_root(&self) -> Result<&Path, ApiError> {
        let tools_dir = &self.config.scan.tools_dir;
        if !self.workspace_root.join(tools_dir).is_dir() {
            return Err(ApiError::NotSourceRoot {
                root: self.workspace_root.clone(),
                tools_dir: tools_dir.clone(),
            });
        }
        Ok(&self.workspace_root)
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let span = info_span!("command", command = command_name(command));
        let _entered = span.enter();
        let started = Instant::now();
        let result = self.execute_inner(command);
        info!(
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis(),
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Install {
                compress,
                format,
                target,
            } => {
                let mut install_config = self.config.install.clone();
                install_config.compress |= *compress;
                let report = Installer::new(self.source_root()?.to_path_buf())
                    .with_rules(self.config.scan.clone())
                    .with_config(install_config)
                    .install(target)?;
                if format == "json" {
                    format_install_json(&report)
                } else {
                    Ok(format_install_text(&report))
                }
            }
            Commands::Pull { format, captured } => {
                let report = Puller::new(self.source_root()?.to_path_buf())
                    .with_config(self.config.pull.clone())
                    .pull(captured)?;
                if format == "json" {
                    format_pull_json(&report)
                } else {
                    Ok(format_pull_text(&report))
                }
            }
            Commands::Config => format_config_toml(&self.config),
        }
    }
}
