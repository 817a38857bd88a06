//! CarryIT CLI - command line client for the property-management API

mod commands;
mod config;
mod logging;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::Commands;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{Level, error, info};

#[derive(Parser)]
#[command(name = "carryit")]
#[command(about = "Command line client for the CarryIT dashboard API")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(short = 'c', long, global = true, env = "CARRYIT_CONFIG")]
    config: Option<PathBuf>,

    /// Timeout for the whole command in seconds (0 = no timeout)
    #[arg(short = 't', long, global = true, default_value = "0")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init_logging(cli.log_level.into(), cli.log_json, cli.log_file.as_deref())?;

    let config = config::load(cli.config.as_deref())?;
    info!(api_base_url = %config.api_base_url, "Starting CarryIT CLI");

    let outcome = if cli.timeout == 0 {
        cli.command.execute(&config).await
    } else {
        let timeout_duration = Duration::from_secs(cli.timeout);
        match tokio::time::timeout(timeout_duration, cli.command.execute(&config)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                error!("Command timed out after {} seconds", cli.timeout);
                std::process::exit(1);
            }
        }
    };

    if let Err(e) = outcome {
        error!("Command failed: {e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}
