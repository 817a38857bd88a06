//! Client configuration
//!
//! Values are layered: built-in defaults, an optional TOML file,
//! `CARRYIT_*` environment variables, and finally `API_BASE_URL`, which
//! always wins when set.

use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Backend used when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "https://carryit-backend.onrender.com/api/v1";

/// Environment variable selecting the backend host
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the REST API, including the version prefix
    pub api_base_url: String,

    /// Default request timeout in seconds
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,

    /// File holding the persisted token pair
    #[serde(default)]
    pub token_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("carryit-client/{}", env!("CARGO_PKG_VERSION")),
            token_file: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from defaults and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if an environment value cannot be parsed or the
    /// resulting configuration is invalid
    pub fn from_env() -> CoreResult<Self> {
        Self::load(None)
    }

    /// Load configuration from a TOML file, with environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the
    /// resulting configuration is invalid
    pub fn from_file<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        Self::load(Some(path.as_ref()))
    }

    fn load(path: Option<&Path>) -> CoreResult<Self> {
        let defaults = Self::default();

        let mut builder = config::Config::builder()
            .set_default("api_base_url", defaults.api_base_url)?
            .set_default("timeout_secs", defaults.timeout_secs)?
            .set_default("user_agent", defaults.user_agent)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix("CARRYIT").try_parsing(true))
            .set_override_option("api_base_url", std::env::var(API_BASE_URL_ENV).ok())?
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid field
    pub fn validate(&self) -> CoreResult<()> {
        let url = url::Url::parse(&self.api_base_url).map_err(|e| {
            CoreError::invalid_config(format!("api_base_url: invalid URL - {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::invalid_config(format!(
                "api_base_url: unsupported scheme '{}'",
                url.scheme()
            )));
        }
        if self.timeout_secs == 0 {
            return Err(CoreError::invalid_config(
                "timeout_secs: must be greater than zero",
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(CoreError::invalid_config("user_agent: cannot be empty"));
        }
        Ok(())
    }

    /// Default request timeout
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Token file location, falling back to the platform data directory
    pub fn token_file_path(&self) -> PathBuf {
        self.token_file.clone().unwrap_or_else(|| {
            directories::ProjectDirs::from("app", "carryit", "carryit").map_or_else(
                || PathBuf::from(".carryit").join("session.json"),
                |dirs| dirs.data_dir().join("session.json"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let config = ClientConfig {
            api_base_url: "not a url".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CoreError::InvalidConfig { .. })
        ));

        let config = ClientConfig {
            api_base_url: "ftp://example.com".to_string(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config = ClientConfig {
            timeout_secs: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carryit.toml");
        std::fs::write(
            &path,
            "api_base_url = \"http://localhost:8000/api/v1\"\ntimeout_secs = 120\n",
        )
        .unwrap();

        let config = ClientConfig::from_file(&path).unwrap();
        // API_BASE_URL may be set in the environment running the tests
        if std::env::var(API_BASE_URL_ENV).is_err() {
            assert_eq!(config.api_base_url, "http://localhost:8000/api/v1");
        }
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_explicit_token_file() {
        let config = ClientConfig {
            token_file: Some(PathBuf::from("/tmp/session.json")),
            ..ClientConfig::default()
        };
        assert_eq!(config.token_file_path(), PathBuf::from("/tmp/session.json"));
    }
}
