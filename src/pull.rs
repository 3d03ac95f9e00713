//! Pull pipeline: decode a captured overlay and write the changed files back
//! into the source tree.

use crate::codec::TreeDecoder;
use crate::config::PullConfig;
use crate::error::ApiError;
use crate::reconcile::{ReconcileReport, Reconciler};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

pub struct Puller {
    dest_root: PathBuf,
    config: PullConfig,
}

impl Puller {
    pub fn new(dest_root: PathBuf) -> Self {
        Self {
            dest_root,
            config: PullConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PullConfig) -> Self {
        self.config = config;
        self
    }

    /// Read `captured`, decode its overlay table and reconcile it.
    ///
    /// Fails with [`ApiError::NoOverlayData`] when the file holds no overlay
    /// marker or an empty overlay table.
    #[instrument(skip(self), fields(dest = %self.dest_root.display()))]
    pub fn pull(&self, captured: &Path) -> Result<ReconcileReport, ApiError> {
        let input = fs::read(captured).map_err(|e| ApiError::io(captured, e))?;
        self.pull_bytes(&input)
    }

    /// Decode and reconcile overlay data that is already in memory
    pub fn pull_bytes(&self, input: &[u8]) -> Result<ReconcileReport, ApiError> {
        let tree = TreeDecoder::new(&self.config.overlay_variable)
            .decode(input)?
            .ok_or(ApiError::NoOverlayData)?;
        info!(files = tree.iter().map(|(_, n)| n.file_count()).sum::<usize>(), "Decoded overlay");

        let report = Reconciler::new(self.dest_root.clone())
            .with_newline_policy(self.config.newline_policy)
            .reconcile(&tree)?;
        Ok(report)
    }
}
