//! Initialization functions for tracing

use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{CoreError, CoreResult};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level filter used when `RUST_LOG` is unset (e.g., "info", "debug")
    pub log_level: String,
    /// Emit JSON lines instead of human readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}

impl LogConfig {
    /// Filter scoped to this workspace's crates at the given level
    pub fn crate_filter(level: &str) -> String {
        format!("carryit={level},carryit_core={level},carryit_http={level}")
    }
}

/// Initialize tracing with the given configuration
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init_tracing(config: &LogConfig) -> CoreResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(LogConfig::crate_filter(&config.log_level)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if config.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| CoreError::invalid_config(format!("Failed to install subscriber: {e}")))
}
