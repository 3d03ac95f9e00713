//! Configuration sources, lowest precedence first: global file, workspace file.

pub mod global_file;
pub mod workspace_file;
