//! Source tree scanner: builds the tree to embed and the list of files to copy

use crate::compress;
use crate::error::ScanError;
use crate::tree::node::{Directory, Node};
use crate::tree::walker::{Entry, Walker, WalkerConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument, trace};

/// Classification rules applied to each entry of the source tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRules {
    /// Version-control metadata directory, skipped at any depth
    #[serde(default = "default_vcs_dir")]
    pub vcs_dir: String,

    /// Top-level directory whose files are never copied to the target
    #[serde(default = "default_tools_dir")]
    pub tools_dir: String,

    /// Extensions whose contents are not embedded (binary assets)
    #[serde(default = "default_unembedded_extensions")]
    pub unembedded_extensions: Vec<String>,

    /// Extensions that are not copied (regenerated or loaded from the embedded tree)
    #[serde(default = "default_uncopied_extensions")]
    pub uncopied_extensions: Vec<String>,
}

fn default_vcs_dir() -> String {
    ".git".to_string()
}

fn default_tools_dir() -> String {
    "tools".to_string()
}

fn default_unembedded_extensions() -> Vec<String> {
    vec!["png".to_string(), "xcf".to_string(), "ttf".to_string()]
}

fn default_uncopied_extensions() -> Vec<String> {
    vec!["toc".to_string(), "lua".to_string()]
}

impl Default for ScanRules {
    fn default() -> Self {
        Self {
            vcs_dir: default_vcs_dir(),
            tools_dir: default_tools_dir(),
            unembedded_extensions: default_unembedded_extensions(),
            uncopied_extensions: default_uncopied_extensions(),
        }
    }
}

impl ScanRules {
    /// Whether a file's bytes go into the embedded tree
    pub fn embeds(&self, relative: &str) -> bool {
        !self
            .unembedded_extensions
            .iter()
            .any(|e| e == extension(relative))
    }

    /// Whether a file is copied verbatim to the target
    pub fn copies(&self, relative: &str) -> bool {
        let in_tools = matches!(
            relative.split_once('/'),
            Some((top, _)) if top == self.tools_dir
        );
        !in_tools
            && !self
                .uncopied_extensions
                .iter()
                .any(|e| e == extension(relative))
    }
}

/// Text after the last `.` of the final path component, or "" when there is none
pub fn extension(relative: &str) -> &str {
    let name = relative.rsplit('/').next().unwrap_or(relative);
    name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
}

/// Result of scanning a source root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// Embedded files and every directory of the source tree
    pub tree: Directory,
    /// `/`-separated paths to copy verbatim, in walk order
    pub copy_list: Vec<String>,
    /// Number of files embedded in `tree`
    pub embedded: usize,
}

/// Scanner over one source root
pub struct Scanner {
    root: PathBuf,
    rules: ScanRules,
    compression: Option<u32>,
}

impl Scanner {
    /// Create a scanner with the default rules and no compression
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            rules: ScanRules::default(),
            compression: None,
        }
    }

    pub fn with_rules(mut self, rules: ScanRules) -> Self {
        self.rules = rules;
        self
    }

    /// Compress embedded contents at the given zlib level
    pub fn with_compression(mut self, level: Option<u32>) -> Self {
        self.compression = level;
        self
    }

    /// Walk the root and classify every file
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn scan(&self) -> Result<ScanResult, ScanError> {
        let start = Instant::now();
        info!(compress = self.compression.is_some(), "Starting source scan");

        let walker_config = WalkerConfig {
            ignore_dirs: vec![self.rules.vcs_dir.clone()],
        };
        let entries = Walker::with_config(self.root.clone(), walker_config).walk()?;
        debug!(entry_count = entries.len(), "Walked source tree");

        let mut tree = Directory::new();
        let mut copy_list = Vec::new();
        let mut embedded = 0;

        for entry in entries {
            match entry {
                Entry::Directory { relative } => {
                    directory_at(&mut tree, &relative)?;
                }
                Entry::File { path, relative } => {
                    if self.rules.embeds(&relative) {
                        let content = self.load(&path)?;
                        let (parent, name) = split_parent(&relative);
                        directory_at(&mut tree, parent)?.insert(name, Node::File(content));
                        embedded += 1;
                        trace!(path = %relative, "Embedded file");
                    }
                    if self.rules.copies(&relative) {
                        trace!(path = %relative, "Queued file for copy");
                        copy_list.push(relative);
                    }
                }
            }
        }

        info!(
            embedded,
            copied = copy_list.len(),
            duration_ms = start.elapsed().as_millis(),
            "Source scan completed"
        );
        Ok(ScanResult {
            tree,
            copy_list,
            embedded,
        })
    }

    fn load(&self, path: &Path) -> Result<Vec<u8>, ScanError> {
        let content = std::fs::read(path).map_err(|source| ScanError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        match self.compression {
            Some(level) => compress::compress(&content, level).map_err(|source| {
                ScanError::Compress {
                    path: path.to_path_buf(),
                    source,
                }
            }),
            None => Ok(content),
        }
    }
}

/// Build the tree and copy list for `root` with the given rules
pub fn scan(root: &Path, rules: &ScanRules) -> Result<ScanResult, ScanError> {
    Scanner::new(root.to_path_buf())
        .with_rules(rules.clone())
        .scan()
}

fn split_parent(relative: &str) -> (&str, &str) {
    relative.rsplit_once('/').unwrap_or(("", relative))
}

/// Descend to (creating as needed) the directory at a `/`-separated path
fn directory_at<'a>(
    root: &'a mut Directory,
    relative: &str,
) -> Result<&'a mut Directory, ScanError> {
    let mut current = root;
    for name in relative.split('/').filter(|n| !n.is_empty()) {
        current = current
            .ensure_directory(name)
            .ok_or_else(|| ScanError::NotADirectory(relative.to_string()))?;
    }
    Ok(current)
}
