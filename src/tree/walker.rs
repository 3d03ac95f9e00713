//! Filesystem walker for traversing a source tree

use crate::error::ScanError;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Filesystem entry types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A regular file with its absolute path and `/`-separated path relative to the root
    File { path: PathBuf, relative: String },
    /// A directory with its path relative to the root
    Directory { relative: String },
}

impl Entry {
    pub fn relative(&self) -> &str {
        match self {
            Entry::File { relative, .. } | Entry::Directory { relative } => relative,
        }
    }
}

/// Filesystem walker configuration
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Directory names pruned at any depth (e.g. ".git")
    pub ignore_dirs: Vec<String>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            ignore_dirs: vec![".git".to_string()],
        }
    }
}

/// Filesystem walker
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Walk the filesystem and collect all entries below the root
    ///
    /// Entries come out depth-first with siblings sorted by name, so every
    /// directory precedes its contents. Symbolic links are resolved and
    /// reported as their targets; a link cycle is a walk error.
    pub fn walk(&self) -> Result<Vec<Entry>, ScanError> {
        let mut entries = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.should_ignore(e));

        for entry in walker {
            let entry = entry.map_err(|source| ScanError::Walk {
                path: self.root.clone(),
                source,
            })?;

            // Skip the root directory itself (we only want its contents)
            if entry.depth() == 0 {
                continue;
            }

            let relative = relative_path(&self.root, entry.path())?;
            let file_type = entry.file_type();
            if file_type.is_dir() {
                entries.push(Entry::Directory { relative });
            } else if file_type.is_file() {
                entries.push(Entry::File {
                    path: entry.path().to_path_buf(),
                    relative,
                });
            }
        }

        Ok(entries)
    }

    /// Check if an entry is a directory that should be pruned by name
    fn should_ignore(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && self
                .config
                .ignore_dirs
                .iter()
                .any(|name| entry.file_name() == OsStr::new(name))
    }
}

/// `/`-joined path of `path` below `root`
fn relative_path(root: &Path, path: &Path) -> Result<String, ScanError> {
    let stripped = path.strip_prefix(root).unwrap_or(path);
    let mut parts = Vec::new();
    for component in stripped.components() {
        let part = component
            .as_os_str()
            .to_str()
            .ok_or_else(|| ScanError::NonUtf8Name(path.to_path_buf()))?;
        parts.push(part);
    }
    Ok(parts.join("/"))
}
