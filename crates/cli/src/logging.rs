use anyhow::Result;
use carryit_core::logging::{LogConfig, init_tracing};
use std::fs::OpenOptions;
use std::path::Path;
use tracing::Level;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging for the CLI
///
/// Logs go to stderr; with `log_file` set they are also appended to that
/// file without ANSI colors.
pub fn init_logging(log_level: Level, json: bool, log_file: Option<&Path>) -> Result<()> {
    let log_level = log_level.as_str().to_lowercase();

    match log_file {
        Some(path) => init_file_logging(&log_level, path),
        None => {
            init_tracing(&LogConfig { log_level, json })?;
            Ok(())
        }
    }
}

fn init_file_logging(level: &str, path: &Path) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| LogConfig::crate_filter(level).into());

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(log_file)
                .with_ansi(false),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}
