//! Solar RPC Client Library
//!
//! This crate provides the node-facing call contract used by the
//! confirmation engine, and a JSON-RPC over HTTP client implementing it.
//!
//! Errors are split into two kinds: the node answering that the queried
//! entity is not visible yet ([`RpcError::is_transient`]), and everything
//! else.

pub mod models;
mod rpc_client;
mod rpc_error;
mod rpc_exception;

pub use models::{JsonRpcError, RpcRequest, RpcResponse};
pub use rpc_client::RpcClient;
pub use rpc_error::RpcError;
pub use rpc_exception::RpcException;

use async_trait::async_trait;
use serde_json::Value;

/// Result type for RPC operations
pub type Result<T> = std::result::Result<T, RpcError>;

/// Method used to check whether a deployed contract is visible on chain.
pub const GET_ACCOUNT_INFO: &str = "getaccountinfo";

/// Call contract towards a node.
#[async_trait]
pub trait RpcCall: Send + Sync {
    /// Invokes `method` with positional `params` and returns its result.
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value>;

    /// Queries the account state of a contract address.
    ///
    /// The address travels hex-encoded, as it is stored in the ledger.
    async fn get_account_info(&self, address: &[u8]) -> Result<Value> {
        self.call(GET_ACCOUNT_INFO, vec![Value::String(hex::encode(address))])
            .await
    }
}
