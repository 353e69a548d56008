//! Solar Ledger Module
//!
//! This crate provides the persisted record of deployed contracts.
//!
//! ## Components
//!
//! - **DeploymentRecord**: one named contract deployment and its confirmation flag
//! - **Ledger**: name-keyed map of records backed by a pretty-printed JSON file
//!
//! The file is rewritten in full on every [`Ledger::commit`], through a
//! temporary sibling file that is renamed over the target.

pub mod record;
pub mod store;

pub use record::DeploymentRecord;
pub use store::Ledger;

use std::path::PathBuf;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger-specific error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing the ledger file failed
    #[error("ledger I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The ledger file exists but does not hold a valid ledger
    #[error("corrupt ledger {}: {source}", .path.display())]
    CorruptLedger {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The referenced contract is not in the ledger
    #[error("Cannot confirm unknown contract {0}")]
    UnknownRecord(String),

    /// The in-memory ledger could not be encoded
    #[error("ledger serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
