//! CLI parse: clap types for overlay-ctl. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// overlay-ctl - Move an addon source tree into the game's embedded filesystem and back
#[derive(Parser, Debug)]
#[command(name = "overlay-ctl")]
#[command(about = "Install an addon with its embedded filesystem, or pull overlay changes back")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Addon source tree root (must contain the tools directory)
    #[arg(long, global = true, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (replaces global and workspace config files)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Disable all logging
    #[arg(long, global = true, default_value = "false", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stderr, stdout, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (when output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install the addon into a target directory
    Install {
        /// Compress embedded file contents
        #[arg(long)]
        compress: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
        /// Target addon directory
        target: PathBuf,
    },
    /// Write overlay changes captured by the game back into the source tree
    Pull {
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
        /// Saved variables file holding the overlay table
        captured: PathBuf,
    },
    /// Print the effective configuration as TOML
    Config,
}
