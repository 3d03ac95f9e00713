//! CLI help and command-name contract for log spans.

use crate::cli::parse::Commands;

/// Command name string recorded on the command span (e.g. "install", "pull").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Install { .. } => "install",
        Commands::Pull { .. } => "pull",
        Commands::Config => "config",
    }
}
