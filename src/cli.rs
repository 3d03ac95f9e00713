//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to the pipelines.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::{map_error, EXIT_FAILURE, EXIT_USAGE};
pub use parse::{Cli, Commands};
pub use presentation::{
    format_config_toml, format_install_json, format_install_text, format_pull_json,
    format_pull_text,
};
pub use route::RunContext;
