use crate::{args::ConfirmArgs, context::Solar};
use anyhow::{bail, Result};
use solar_confirmation::{ConfirmationEngine, ConfirmationReport, RetryPolicy};
use solar_events::Event;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Confirms every pending deployment in the ledger.
///
/// Contracts that stay unconfirmed are reported but only fail the command
/// with `--strict`.
pub async fn run(
    solar: &mut Solar,
    args: &ConfirmArgs,
    cancel: CancellationToken,
) -> Result<ConfirmationReport> {
    let policy = retry_policy(solar, args);
    let reporter = solar.reporter();
    let engine = ConfirmationEngine::new(solar.rpc()?, reporter.clone())
        .with_policy(policy)
        .with_cancellation(cancel);

    let report = engine.confirm_all(solar.ledger()?).await?;

    for (name, err) in &report.failed {
        reporter.submit(Event::status(format!("\u{274c}  {name}: {err}")));
    }

    if args.strict && !report.is_complete() {
        bail!(
            "{} of {} contracts not confirmed",
            report.failed.len(),
            report.total()
        );
    }
    Ok(report)
}

fn retry_policy(solar: &Solar, args: &ConfirmArgs) -> RetryPolicy {
    let mut policy = RetryPolicy::from(&solar.settings().retry);
    if let Some(max_attempts) = args.max_attempts {
        policy = policy.with_max_attempts(max_attempts);
    }
    if let Some(secs) = args.timeout {
        policy = policy.with_timeout(Duration::from_secs(secs));
    }
    policy
}
