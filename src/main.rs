//! secure-api - credentials for secure REST APIs
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use secure_api::cli::{Cli, Commands};
use secure_api::config::ConfigManager;
use secure_api::error::SecureApiResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> SecureApiResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("secure_api=warn"),
        1 => EnvFilter::new("secure_api=info"),
        _ => EnvFilter::new("secure_api=debug"),
    };

    // Logs go to stderr; stdout carries secrets and plans
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };

    let mut config = config_manager.load().await?;
    if let Some(root) = cli.cache_root {
        debug!("Using cache root {}", root.display());
        config.cache.root = Some(root);
    }

    if cli.test {
        debug!("Test mode enabled, no cache or AWS calls will be made");
    }

    match cli.command {
        Commands::Resolve(args) => secure_api::cli::commands::resolve(args, &config, cli.test).await,
        Commands::Plan(args) => secure_api::cli::commands::plan(args, &config, cli.test).await,
        Commands::Cache(args) => secure_api::cli::commands::cache(args, &config).await,
        Commands::Config(args) => {
            secure_api::cli::commands::config(args, &config, &config_manager).await
        }
    }
}
