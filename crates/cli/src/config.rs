//! Resolution of the effective settings.
//!
//! Command-line flags win over environment variables (both come through
//! clap), which win over the configuration file, which wins over the
//! built-in defaults.

use crate::args::Cli;
use anyhow::{Context, Result};
use solar_config::{RetryConfig, RpcConfig, SolarConfig, DEFAULT_CONFIG_FILE};
use std::path::{Path, PathBuf};

/// Settings a command runs with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub environment: String,
    pub ledger_path: PathBuf,
    pub rpc: RpcConfig,
    pub retry: RetryConfig,
    pub log_level: String,
}

impl Settings {
    /// Loads the configuration file named by `cli` (or `solar.toml` in the
    /// working directory) and applies the flag overrides.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => SolarConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => SolarConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
        };
        Ok(Self::merge(cli, file))
    }

    /// Applies the flag overrides in `cli` on top of `file`.
    pub fn merge(cli: &Cli, file: SolarConfig) -> Self {
        let environment = cli
            .environment
            .clone()
            .unwrap_or_else(|| file.environment().to_string());

        let ledger_path = solar_config::ledger_path(
            cli.repo.as_deref().or(file.ledger.as_deref()),
            &environment,
        );

        let mut rpc = file.rpc;
        if let Some(url) = &cli.rpc {
            rpc.url = Some(url.clone());
        }

        let log_level = cli.log_level.clone().unwrap_or(file.logging.level);

        Self {
            environment,
            ledger_path,
            rpc,
            retry: file.retry,
            log_level,
        }
    }
}
