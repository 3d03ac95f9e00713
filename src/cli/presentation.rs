//! CLI presentation: text and json formatters per command.

mod config;
mod install;
mod pull;

pub use config::format_config_toml;
pub use install::{format_install_json, format_install_text};
pub use pull::{format_pull_json, format_pull_text};
