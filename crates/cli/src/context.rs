use crate::config::Settings;
use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use solar_events::{LogSink, Reporter, TerminalSink};
use solar_ledger::Ledger;
use solar_rpc_client::RpcClient;
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Components shared by the commands, built on first use.
///
/// `status` never talks to the node, so a missing RPC url only fails the
/// commands that need one.
pub struct Solar {
    settings: Settings,
    rpc: OnceCell<Arc<RpcClient>>,
    reporter: OnceCell<Reporter>,
    ledger: Option<Ledger>,
}

impl Solar {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            rpc: OnceCell::new(),
            reporter: OnceCell::new(),
            ledger: None,
        }
    }

    /// Uses `reporter` instead of spawning one for the terminal.
    pub fn with_reporter(self, reporter: Reporter) -> Self {
        let _ = self.reporter.set(reporter);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn rpc(&self) -> Result<Arc<RpcClient>> {
        self.rpc
            .get_or_try_init(|| -> Result<Arc<RpcClient>> {
                let url = self.settings.rpc.endpoint()?;
                let timeout = Duration::from_secs(self.settings.rpc.timeout_secs);
                debug!(target: "solar::cli", host = url.host_str(), "creating rpc client");
                let client = RpcClient::with_timeout(url, timeout)
                    .context("failed to create rpc client")?;
                Ok(Arc::new(client))
            })
            .cloned()
    }

    /// Progress reporter; a spinner on a terminal, log lines otherwise.
    pub fn reporter(&self) -> Reporter {
        self.reporter
            .get_or_init(|| {
                if std::io::stderr().is_terminal() {
                    Reporter::spawn(TerminalSink::new())
                } else {
                    Reporter::spawn(LogSink)
                }
            })
            .clone()
    }

    pub fn ledger(&mut self) -> Result<&mut Ledger> {
        let ledger = match self.ledger.take() {
            Some(ledger) => ledger,
            None => {
                let path = &self.settings.ledger_path;
                debug!(target: "solar::cli", path = %path.display(), "opening ledger");
                Ledger::open(path)
                    .with_context(|| format!("failed to open ledger {}", path.display()))?
            }
        };
        Ok(self.ledger.insert(ledger))
    }

    /// Flushes pending progress output.
    pub async fn shutdown(&self) {
        if let Some(reporter) = self.reporter.get() {
            reporter.shutdown().await;
        }
    }
}
