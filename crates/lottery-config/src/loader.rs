//! Configuration loading, following the same load-then-validate flow
//! used elsewhere in this codebase's config crates.

use std::path::Path;

use thiserror::Error;

use crate::types::LotteryConfig;

/// Configuration loading/validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found.
    #[error("config file not found: {0}")]
    NotFound(String),

    /// IO error reading the config file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error.
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Semantic validation error.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Loads and validates a [`LotteryConfig`].
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file on disk.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<LotteryConfig, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a TOML string.
    pub fn load_str(content: &str) -> Result<LotteryConfig, ConfigError> {
        let config: LotteryConfig = toml::from_str(content)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Re-check the semantic constraints `load_file`/`load_str` already
    /// enforce. Callers that mutate a loaded config (e.g. applying CLI
    /// overrides) must call this again before trusting the result.
    pub fn validate(config: &LotteryConfig) -> Result<(), ConfigError> {
        if config.server.workers == 0 {
            return Err(ConfigError::Validation(
                "server.workers must be at least 1".into(),
            ));
        }
        if config.server.accept_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "server.accept_timeout_secs must be at least 1".into(),
            ));
        }
        if config.server.listen.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "server.listen '{}' is not a valid socket address",
                config.server.listen
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.server.workers, 5);
        assert_eq!(config.lottery.winning_number, 7574);
    }

    #[test]
    fn rejects_zero_workers() {
        let toml = "[server]\nworkers = 0\n";
        assert!(matches!(
            ConfigLoader::load_str(toml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn rejects_invalid_listen_address() {
        let toml = "[server]\nlisten = \"not-an-address\"\n";
        assert!(matches!(
            ConfigLoader::load_str(toml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn overrides_winning_number() {
        let toml = "[lottery]\nwinning_number = 42\n";
        let config = ConfigLoader::load_str(toml).unwrap();
        assert_eq!(config.lottery.winning_number, 42);
    }

    #[test]
    fn missing_file_is_not_found() {
        assert!(matches!(
            ConfigLoader::load_file("/nonexistent/path.toml"),
            Err(ConfigError::NotFound(_))
        ));
    }
}
