//! CLI configuration utilities

use anyhow::{Context, Result};
use carryit_core::ClientConfig;
use std::path::Path;

/// Load client configuration from `path`, or from the environment alone
pub fn load(path: Option<&Path>) -> Result<ClientConfig> {
    match path {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => ClientConfig::from_env().context("Failed to load configuration"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "timeout_secs = 45").unwrap();
        writeln!(file, "user_agent = \"carryit-cli-test\"").unwrap();

        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.timeout_secs, 45);
        assert_eq!(config.user_agent, "carryit-cli-test");
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = load(Some(Path::new("/nonexistent/carryit.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/carryit.toml"));
    }
}
