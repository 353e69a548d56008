//! RPC Models
//!
//! This module contains the JSON-RPC request and response envelopes.

mod rpc_request;
mod rpc_response;

pub use rpc_request::RpcRequest;
pub use rpc_response::{JsonRpcError, RpcResponse};
