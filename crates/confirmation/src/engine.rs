use crate::{ConfirmError, Result, RetryPolicy};
use solar_events::{Event, Reporter};
use solar_ledger::{DeploymentRecord, Ledger};
use solar_rpc_client::RpcCall;
use std::sync::Arc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Outcome of one [`ConfirmationEngine::confirm_all`] batch
#[derive(Debug, Default)]
pub struct ConfirmationReport {
    /// Ledger keys of the records confirmed during this batch
    pub confirmed: Vec<String>,
    /// Ledger keys of the records left unconfirmed, with the reason
    pub failed: Vec<(String, ConfirmError)>,
}

impl ConfirmationReport {
    /// Number of records the batch looked at.
    pub fn total(&self) -> usize {
        self.confirmed.len() + self.failed.len()
    }

    /// Whether every pending record got confirmed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Drives pending ledger entries to confirmation.
///
/// Records are polled one at a time; each transient "not visible yet" answer
/// is followed by a backoff sleep from the [`RetryPolicy`].
pub struct ConfirmationEngine {
    rpc: Arc<dyn RpcCall>,
    reporter: Reporter,
    policy: RetryPolicy,
    cancel: CancellationToken,
}

impl ConfirmationEngine {
    pub fn new(rpc: Arc<dyn RpcCall>, reporter: Reporter) -> Self {
        Self {
            rpc,
            reporter,
            policy: RetryPolicy::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Stops the batch early once `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Confirms every unconfirmed record and persists the ledger.
    ///
    /// Progress is announced as `(i/total)` before the first record and after
    /// each one, followed by a single completion event. The ledger is
    /// committed exactly once, whatever happened to individual records.
    pub async fn confirm_all(&self, ledger: &mut Ledger) -> Result<ConfirmationReport> {
        let pending = ledger.unconfirmed_records();
        let total = pending.len();
        let mut report = ConfirmationReport::default();

        info!(
            target: "solar::confirm",
            pending = total,
            ledger = %ledger.path().display(),
            "confirming contracts"
        );

        self.update_progress(0, total);

        for (i, (key, record)) in pending.iter().enumerate() {
            let outcome = match self.confirm_one(record).await {
                Ok(attempts) => ledger.confirm(key).map(|()| attempts).map_err(ConfirmError::from),
                Err(err) => Err(err),
            };

            match outcome {
                Ok(attempts) => {
                    info!(
                        target: "solar::confirm",
                        contract = %key,
                        address = %record.address_hex(),
                        attempts,
                        "contract confirmed"
                    );
                    report.confirmed.push(key.clone());
                }
                Err(err) => {
                    warn!(
                        target: "solar::confirm",
                        contract = %key,
                        address = %record.address_hex(),
                        error = %err,
                        "contract not confirmed"
                    );
                    report.failed.push((key.clone(), err));
                }
            }

            self.update_progress(i + 1, total);
        }

        ledger.commit()?;

        info!(
            target: "solar::confirm",
            confirmed = report.confirmed.len(),
            failed = report.failed.len(),
            "confirmation batch finished"
        );
        Ok(report)
    }

    /// Polls the node until `record` is visible.
    ///
    /// Returns the number of attempts it took. Only transient errors are
    /// retried; anything else ends the loop immediately.
    pub async fn confirm_one(&self, record: &DeploymentRecord) -> Result<u32> {
        let started = Instant::now();
        let deadline = self.policy.timeout.map(|timeout| started + timeout);
        let mut attempts: u32 = 0;

        loop {
            if self.cancel.is_cancelled() {
                return Err(ConfirmError::Cancelled);
            }
            attempts = attempts.saturating_add(1);

            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(ConfirmError::Cancelled),
                result = self.rpc.get_account_info(record.address()) => result,
            };

            let err = match result {
                Ok(_) => return Ok(attempts),
                Err(err) if err.is_transient() => err,
                Err(err) => return Err(ConfirmError::Rpc(err)),
            };

            debug!(
                target: "solar::confirm",
                contract = record.name(),
                attempt = attempts,
                error = %err,
                "contract not visible yet"
            );

            if !self.policy.allows_retry(attempts) {
                return Err(ConfirmError::RetriesExhausted {
                    attempts,
                    last: err,
                });
            }

            let delay = self.policy.backoff(&mut rand::thread_rng());
            if let Some(deadline) = deadline {
                if Instant::now() + delay >= deadline {
                    return Err(ConfirmError::TimedOut {
                        attempts,
                        elapsed: started.elapsed(),
                    });
                }
            }

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(ConfirmError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    fn update_progress(&self, i: usize, total: usize) {
        self.reporter
            .submit(Event::progress(format!("({i}/{total}) Confirming contracts")));

        if i == total {
            self.reporter
                .submit(Event::complete("\u{1f680}  All contracts confirmed"));
        }
    }
}
