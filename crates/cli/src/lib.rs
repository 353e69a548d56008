//! Solar CLI Library
//!
//! Command-line front end for the deployment ledger: `confirm` waits for
//! pending contracts to appear on chain, `status` lists what the ledger holds.

use tracing_subscriber::{fmt, EnvFilter};

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod args;
pub mod commands;
pub mod config;
pub mod context;

pub use args::{Cli, Command};
pub use config::Settings;
pub use context::Solar;

/// Installs the global subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
