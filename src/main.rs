//! fake-secrets - Synthetic keys and certificates
//!
//! CLI entry point that dispatches to subcommands.

use clap::{Parser, ValueEnum};
use console::style;
use fake_secrets::cli::{Cli, Commands, LogFormat};
use fake_secrets::config::ConfigManager;
use fake_secrets::error::{SecretsError, SecretsResult};
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

async fn run() -> SecretsResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let mut config = config_manager.load().await?;

    if let Some(seed) = cli.seed {
        config.random.seed = seed;
    }

    let format = match cli.log_format {
        Some(format) => format,
        None => LogFormat::from_str(&config.general.log_format, true).map_err(|reason| {
            SecretsError::ConfigInvalid {
                path: config_manager.path().to_path_buf(),
                reason: format!("general.log_format: {}", reason),
            }
        })?,
    };

    // Initialize logging: 0 = configured level, 1 = info, 2+ = debug
    let level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_new(format!("fake_secrets={}", level)).map_err(|e| {
        SecretsError::ConfigInvalid {
            path: config_manager.path().to_path_buf(),
            reason: format!("general.log_level: {}", e),
        }
    })?;

    let logger = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => logger.without_time().init(),
        LogFormat::Json => logger.json().init(),
    }

    debug!("Using config {}", config_manager.path().display());

    // Dispatch to command
    match cli.command {
        Commands::Key(args) => fake_secrets::cli::commands::key(args, &config).await,
        Commands::Cert(args) => fake_secrets::cli::commands::cert(args, &config).await,
        Commands::Config(args) => {
            fake_secrets::cli::commands::config(args, &config, &config_manager).await
        }
    }
}
