use anyhow::Result;
use clap::Parser;
use solar_cli::{commands, init_tracing, Cli, Command, Settings, Solar};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::resolve(&cli)?;
    init_tracing(&settings.log_level);

    info!(
        target: "solar::cli",
        version = solar_cli::VERSION,
        environment = %settings.environment,
        ledger = %settings.ledger_path.display(),
        "solar starting"
    );

    let mut solar = Solar::new(settings);
    let result = match &cli.command {
        Command::Confirm(args) => {
            let cancel = CancellationToken::new();
            let watcher = tokio::spawn(cancel_on_ctrl_c(cancel.clone()));
            let result = commands::confirm::run(&mut solar, args, cancel).await;
            watcher.abort();
            result.map(|_| ())
        }
        Command::Status(args) => commands::status::run(&mut solar, args),
    };

    solar.shutdown().await;
    result
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!(target: "solar::cli", "shutdown signal received (Ctrl+C)");
            cancel.cancel();
        }
        Err(err) => warn!(target: "solar::cli", error = %err, "failed to wait for shutdown signal"),
    }
}
