//! Configuration types for the lottery agency server.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotteryConfig {
    /// Listener / worker-pool tuning.
    #[serde(default)]
    pub server: ServerConfig,

    /// Lottery-domain configuration.
    #[serde(default)]
    pub lottery: LotteryDomainConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for LotteryConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            lottery: LotteryDomainConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Listener, worker-pool and timing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the TCP listener on.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// `listen(2)` backlog.
    #[serde(default = "default_backlog")]
    pub backlog: u32,

    /// Number of worker threads, also the bounded-channel capacity
    /// (`W` in the spec — one per agency by default).
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Accept-timeout, in seconds, that triggers the lottery barrier.
    #[serde(default = "default_accept_timeout_secs")]
    pub accept_timeout_secs: u64,
}

fn default_listen() -> String {
    "0.0.0.0:12345".to_string()
}

fn default_backlog() -> u32 {
    16
}

fn default_workers() -> usize {
    5
}

fn default_accept_timeout_secs() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            backlog: default_backlog(),
            workers: default_workers(),
            accept_timeout_secs: default_accept_timeout_secs(),
        }
    }
}

/// Lottery-domain configuration: the winning number and the bet store
/// location. Both are injected configuration rather than hidden
/// globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotteryDomainConfig {
    /// The winning lottery number. Never read from the wire.
    #[serde(default = "default_winning_number")]
    pub winning_number: u16,

    /// Path to the persisted CSV bet store.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

fn default_winning_number() -> u16 {
    7574
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./bets.csv")
}

impl Default for LotteryDomainConfig {
    fn default() -> Self {
        Self {
            winning_number: default_winning_number(),
            store_path: default_store_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` / `EnvFilter` level string, e.g. `"info"`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
