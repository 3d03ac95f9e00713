//! overlay-ctl: Addon Filesystem Overlay Transfer
//!
//! Encodes an addon source tree as a nested table literal embedded in a
//! generated data file (`install`), and decodes the overlay table the game
//! saves back into the source tree, rewriting only changed files (`pull`).

pub mod cli;
pub mod codec;
pub mod compress;
pub mod config;
pub mod error;
pub mod install;
pub mod logging;
pub mod pull;
pub mod reconcile;
pub mod tree;
