//! banker - Deadlock avoidance and recovery toolkit
//!
//! This is the CLI collaborator around the banker crates: it collects an
//! allocation state, runs one operation over it and renders the result.

mod cli;
mod commands;
mod display;
mod error;
mod logging;

use crate::cli::{Cli, Commands, GlobalArgs};
use crate::commands::execute_command;
use crate::display::OutputRenderer;
use crate::error::CliError;
use banker_config::Config;
use banker_types::OutputFormat;
use clap::Parser;
use std::process;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    // Initialize tracing with JSON awareness
    logging::init_tracing(json_mode, cli.global.debug);

    // Run the application and handle errors
    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        if json_mode {
            let body = serde_json::json!({
                "error": e.to_string(),
                "code": e.code(),
            });
            println!("{body}");
        } else {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting banker v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli.global, &cli.command);

    let renderer = OutputRenderer::new(
        config.general.default_output == OutputFormat::Json,
        config.general.color,
    );

    let result = execute_command(cli.command, &config).await?;
    logging::log_result(&result);
    renderer.render_result(&result)?;

    info!("Command completed successfully");
    Ok(())
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &GlobalArgs, command: &Commands) {
    // Global CLI flags override everything
    if global.json {
        config.general.default_output = OutputFormat::Json;
    }
    if let Some(color) = global.color {
        config.general.color = color;
    }

    // Command-specific CLI flags
    if let Commands::Recover {
        max_preemptions: Some(max),
        ..
    } = command
    {
        config.recovery.max_preemptions = *max;
    }
}
