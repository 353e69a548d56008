//! Solar Confirmation Engine
//!
//! Polls the node for every unconfirmed ledger entry until it is visible on
//! chain or fails fatally, reports progress through the event pipeline and
//! persists the ledger once the batch is done.
//!
//! Per-record failures never abort a batch; they are collected into the
//! [`ConfirmationReport`]. Only persisting the ledger can fail a batch.

mod engine;
mod retry;

pub use engine::{ConfirmationEngine, ConfirmationReport};
pub use retry::RetryPolicy;

use solar_rpc_client::RpcError;
use std::time::Duration;
use thiserror::Error;

/// Result type for confirmation operations
pub type Result<T> = std::result::Result<T, ConfirmError>;

/// Confirmation failures
#[derive(Debug, Error)]
pub enum ConfirmError {
    /// The node rejected the query for a reason waiting cannot fix
    #[error("rpc call failed: {0}")]
    Rpc(#[source] RpcError),

    /// The retry policy ran out of attempts
    #[error("contract still not visible after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: RpcError },

    /// The retry policy deadline passed
    #[error("confirmation timed out after {elapsed:?} ({attempts} attempts)")]
    TimedOut { attempts: u32, elapsed: Duration },

    /// The batch was cancelled before the record was confirmed
    #[error("confirmation cancelled")]
    Cancelled,

    /// Updating or persisting the ledger failed
    #[error(transparent)]
    Ledger(#[from] solar_ledger::Error),
}
