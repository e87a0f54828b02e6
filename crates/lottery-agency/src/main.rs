//! Lottery agency - central server for the distributed lottery system
//!
//! # Usage
//! ```bash
//! lottery-agency --config lottery.toml
//! lottery-agency --listen 0.0.0.0:12345 --workers 5
//! lottery-agency --config lottery.toml --check
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lottery_config::ConfigLoader;
use lottery_server::LotteryServer;

/// Central lottery agency server
#[derive(Parser, Debug)]
#[command(name = "lottery-agency")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "lottery.toml")]
    config: PathBuf,

    /// Override the listen address from the config file
    #[arg(long)]
    listen: Option<String>,

    /// Override the worker-pool size from the config file
    #[arg(long)]
    workers: Option<usize>,

    /// Override the winning number from the config file
    #[arg(long)]
    winning_number: Option<u16>,

    /// Validate configuration and exit
    #[arg(long)]
    check: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    tracing::info!("lottery-agency v{}", env!("CARGO_PKG_VERSION"));

    let mut config = if args.config.exists() {
        ConfigLoader::load_file(&args.config)
            .with_context(|| format!("failed to load config from {:?}", args.config))?
    } else {
        tracing::info!(
            path = %args.config.display(),
            "config file not found, using defaults"
        );
        ConfigLoader::load_str("")?
    };

    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(workers) = args.workers {
        config.server.workers = workers;
    }
    if let Some(winning_number) = args.winning_number {
        config.lottery.winning_number = winning_number;
    }

    ConfigLoader::validate(&config).context("invalid configuration after CLI overrides")?;

    tracing::info!(
        listen = %config.server.listen,
        workers = config.server.workers,
        accept_timeout_secs = config.server.accept_timeout_secs,
        "loaded configuration"
    );

    if args.check {
        tracing::info!("configuration is valid");
        return Ok(());
    }

    let server = LotteryServer::new(config);
    server.run().context("server run failed")?;

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}
