//! Error types for the overlay transfer tool.

use std::path::PathBuf;
use thiserror::Error;

/// Malformed overlay data encountered while decoding a captured literal
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("line {line}: unrecognised overlay entry: {text}")]
    UnrecognisedLine { line: usize, text: String },

    #[error("line {line}: malformed key: {text}")]
    InvalidKey { line: usize, text: String },

    #[error("line {line}: invalid escape sequence in string literal")]
    InvalidEscape { line: usize },

    #[error("line {line}: unterminated string literal")]
    UnterminatedString { line: usize },

    #[error("line {line}: slot entry inside a directory body")]
    SlotInsideDirectory { line: usize },

    #[error("line {line}: slot {slot} is defined more than once")]
    DuplicateSlot { line: usize, slot: u32 },

    #[error("line {line}: directory already has an entry named {name:?}")]
    DuplicateName { line: usize, name: String },

    #[error("line {line}: closing brace without an open directory")]
    UnbalancedClose { line: usize },

    #[error("line {line}: end of overlay data while a directory is still open")]
    UnclosedDirectory { line: usize },

    #[error("overlay data ends without a closing marker line")]
    UnexpectedEof,

    #[error("line {line}: name is not valid UTF-8")]
    InvalidName { line: usize },

    #[error("overlay mixes a slot-table root with named top-level entries")]
    MixedLayout,

    #[error("root slot 1 is missing")]
    MissingRoot,

    #[error("root slot 1 is not a directory")]
    RootNotDirectory,

    #[error("entry {name:?} refers to slot {slot}, which is not defined")]
    UnresolvedSlot { name: String, slot: u32 },

    #[error("entry {name:?} refers to slot {slot}, which is already in use")]
    SlotReused { name: String, slot: u32 },
}

/// Failures while building the in-memory tree from a source root
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to walk {path:?}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File name is not valid UTF-8: {0:?}")]
    NonUtf8Name(PathBuf),

    #[error("Path {0:?} is both a file and a directory")]
    NotADirectory(String),

    #[error("Failed to compress {path:?}: {source}")]
    Compress {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Filesystem failures while applying a decoded tree
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Failed to create directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Refusing to write entry named {name:?} outside its directory")]
    UnsafeName { name: String },
}

/// Top-level errors surfaced by the install and pull pipelines
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No overlay data found")]
    NoOverlayData,

    #[error("Malformed overlay data: {0}")]
    Decode(#[from] DecodeError),

    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error("Reconcile failed: {0}")]
    Reconcile(#[from] ReconcileError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to render output: {0}")]
    Render(String),

    #[error("{root:?} is not an addon source root: missing {tools_dir}/ directory")]
    NotSourceRoot { root: PathBuf, tools_dir: String },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl ApiError {
    /// Attach a path to a raw I/O error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ApiError::Io {
            path: path.into(),
            source,
        }
    }
}
