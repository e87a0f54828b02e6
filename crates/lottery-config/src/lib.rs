//! Configuration for the lottery agency server: pure data types plus a
//! TOML loader, following this codebase's `apex-config` convention.

mod loader;
mod types;

pub use loader::{ConfigError, ConfigLoader};
pub use types::{LoggingConfig, LotteryConfig, LotteryDomainConfig, ServerConfig};
