//! Install pipeline: scan the source tree, render the embedded tree as a
//! data file in the target, and copy the remaining files verbatim.

use crate::codec::render_assignment;
use crate::config::InstallConfig;
use crate::error::ApiError;
use crate::tree::{ScanRules, Scanner};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Outcome of an install run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    /// Target directory that was written
    pub target: PathBuf,
    /// Generated data file, absolute or relative as the target was given
    pub data_file: PathBuf,
    /// Files embedded in the data file
    pub embedded: usize,
    /// Files copied verbatim
    pub copied: usize,
    /// Size in bytes of the generated data file
    pub literal_bytes: usize,
    /// Whether embedded contents were zlib-compressed
    pub compressed: bool,
}

pub struct Installer {
    source_root: PathBuf,
    rules: ScanRules,
    config: InstallConfig,
}

impl Installer {
    pub fn new(source_root: PathBuf) -> Self {
        Self {
            source_root,
            rules: ScanRules::default(),
            config: InstallConfig::default(),
        }
    }

    pub fn with_rules(mut self, rules: ScanRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_config(mut self, config: InstallConfig) -> Self {
        self.config = config;
        self
    }

    /// Install into `target`.
    ///
    /// Existing files in the target are overwritten; files that are not part
    /// of the source tree are left alone.
    #[instrument(skip(self), fields(source = %self.source_root.display()))]
    pub fn install(&self, target: &Path) -> Result<InstallReport, ApiError> {
        let start = Instant::now();
        let compression = self
            .config
            .compress
            .then_some(self.config.compression_level);

        let scanned = Scanner::new(self.source_root.clone())
            .with_rules(self.rules.clone())
            .with_compression(compression)
            .scan()?;

        let literal = render_assignment(&self.config.data_variable, &scanned.tree);

        fs::create_dir_all(target).map_err(|e| ApiError::io(target, e))?;

        let data_file = target.join(&self.config.data_file);
        ensure_parent(&data_file)?;
        fs::write(&data_file, literal.as_bytes()).map_err(|e| ApiError::io(&data_file, e))?;
        debug!(path = %data_file.display(), bytes = literal.len(), "Wrote data file");

        for relative in &scanned.copy_list {
            let from = self.source_root.join(relative);
            let to = target.join(relative);
            ensure_parent(&to)?;
            fs::copy(&from, &to).map_err(|e| ApiError::io(&from, e))?;
            debug!(path = %relative, "Copied file");
        }

        info!(
            embedded = scanned.embedded,
            copied = scanned.copy_list.len(),
            literal_bytes = literal.len(),
            duration_ms = start.elapsed().as_millis(),
            "Install completed"
        );

        Ok(InstallReport {
            target: target.to_path_buf(),
            data_file,
            embedded: scanned.embedded,
            copied: scanned.copy_list.len(),
            literal_bytes: literal.len(),
            compressed: compression.is_some(),
        })
    }
}

fn ensure_parent(path: &Path) -> Result<(), ApiError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| ApiError::io(parent, e))
        }
        _ => Ok(()),
    }
}
