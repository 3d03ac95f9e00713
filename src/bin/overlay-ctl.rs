//! overlay-ctl CLI Binary
//!
//! Command-line entry point for installing the addon and pulling overlay changes.

use clap::Parser;
use overlay_ctl::cli::{map_error, Cli, RunContext, EXIT_FAILURE};
#[cfg(test)]
use overlay_ctl::cli::EXIT_USAGE;
use overlay_ctl::config::ConfigLoader;
use overlay_ctl::logging::{init_logging, resolve_log_file_path, LoggingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    // Build logging config from CLI args, env vars, and config file
    let logging_config = build_logging_config(&cli);

    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(EXIT_FAILURE);
    }

    info!("overlay-ctl starting");

    let context = match RunContext::new(cli.workspace.clone(), cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error initializing workspace: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(EXIT_FAILURE);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(EXIT_FAILURE);
        }
    }
}

/// Build logging configuration from CLI args and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = if let Some(ref config_path) = cli.config {
        ConfigLoader::load_from_file(config_path)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    } else {
        ConfigLoader::load(&cli.workspace)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    };

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }

    if config.enabled && config.output == "file" {
        if let Ok(path) = resolve_log_file_path(
            cli.log_file.clone(),
            config.file.clone(),
            Some(cli.workspace.as_path()),
        ) {
            config.file = Some(path);
        }
    } else if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }

    config
}
