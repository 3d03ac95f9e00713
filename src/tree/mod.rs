//! Filesystem tree
//!
//! The in-memory tree exchanged with the game: directories hold named
//! children, files hold raw bytes. The scanner builds one from a source root.

pub mod node;
pub mod scanner;
pub mod walker;

pub use node::{Directory, Node};
pub use scanner::{scan, ScanResult, ScanRules, Scanner};
