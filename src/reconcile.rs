//! Apply a decoded overlay tree to the source tree on disk
//!
//! Only files whose decoded content differs from what is on disk get written.
//! Directories are created as needed; an existing directory is not an error.
//! A missing file reads as empty content.

use crate::error::ReconcileError;
use crate::tree::node::{Directory, Node};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// How line endings are treated when comparing decoded and on-disk content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewlinePolicy {
    /// Byte-for-byte comparison
    #[default]
    Exact,
    /// CRLF and LF compare equal
    Normalize,
}

impl NewlinePolicy {
    fn same_content(self, on_disk: &[u8], decoded: &[u8]) -> bool {
        match self {
            NewlinePolicy::Exact => on_disk == decoded,
            NewlinePolicy::Normalize => normalize_newlines(on_disk) == normalize_newlines(decoded),
        }
    }
}

/// Replace every CRLF pair with LF
pub fn normalize_newlines(data: &[u8]) -> Cow<'_, [u8]> {
    if !data.windows(2).any(|w| w == b"\r\n") {
        return Cow::Borrowed(data);
    }
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    while i < data.len() {
        if data[i] == b'\r' && data.get(i + 1) == Some(&b'\n') {
            i += 1;
            continue;
        }
        out.push(data[i]);
        i += 1;
    }
    Cow::Owned(out)
}

/// Files written by a reconcile pass, as `/`-separated relative paths in
/// traversal order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub changed: Vec<String>,
}

impl ReconcileReport {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Writes a decoded tree below a destination root
pub struct Reconciler {
    dest_root: PathBuf,
    policy: NewlinePolicy,
}

impl Reconciler {
    pub fn new(dest_root: PathBuf) -> Self {
        Self {
            dest_root,
            policy: NewlinePolicy::default(),
        }
    }

    pub fn with_newline_policy(mut self, policy: NewlinePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Walk `tree` depth-first, writing every file whose content changed
    #[instrument(skip(self, tree), fields(dest = %self.dest_root.display()))]
    pub fn reconcile(&self, tree: &Directory) -> Result<ReconcileReport, ReconcileError> {
        fs::create_dir_all(&self.dest_root).map_err(|source| ReconcileError::CreateDir {
            path: self.dest_root.clone(),
            source,
        })?;

        let mut report = ReconcileReport::default();
        self.apply_directory(tree, "", &mut report)?;
        info!(changed = report.changed.len(), "Reconcile completed");
        Ok(report)
    }

    fn apply_directory(
        &self,
        dir: &Directory,
        base: &str,
        report: &mut ReconcileReport,
    ) -> Result<(), ReconcileError> {
        for (name, node) in dir.iter() {
            if !is_safe_name(name) {
                return Err(ReconcileError::UnsafeName {
                    name: name.to_string(),
                });
            }
            let relative = if base.is_empty() {
                name.to_string()
            } else {
                format!("{}/{}", base, name)
            };
            let path = self.dest_root.join(&relative);

            match node {
                Node::Directory(child) => {
                    create_dir_idempotent(&path)?;
                    self.apply_directory(child, &relative, report)?;
                }
                Node::File(content) => {
                    let current = read_or_empty(&path)?;
                    if self.policy.same_content(&current, content) {
                        debug!(path = %relative, "Unchanged");
                        continue;
                    }
                    fs::write(&path, content).map_err(|source| ReconcileError::Write {
                        path: path.clone(),
                        source,
                    })?;
                    debug!(path = %relative, bytes = content.len(), "Wrote file");
                    report.changed.push(relative);
                }
            }
        }
        Ok(())
    }
}

/// Apply `tree` below `dest_root` with byte-exact comparison
pub fn reconcile(tree: &Directory, dest_root: &Path) -> Result<ReconcileReport, ReconcileError> {
    Reconciler::new(dest_root.to_path_buf()).reconcile(tree)
}

/// A name that stays inside its parent directory
fn is_safe_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

fn create_dir_idempotent(path: &Path) -> Result<(), ReconcileError> {
    match fs::create_dir(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(source) => Err(ReconcileError::CreateDir {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn read_or_empty(path: &Path) -> Result<Vec<u8>, ReconcileError> {
    match fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(source) => Err(ReconcileError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
