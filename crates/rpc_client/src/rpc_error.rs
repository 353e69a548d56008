use crate::rpc_exception::RpcException;
use thiserror::Error;

/// Failure of a single RPC call
#[derive(Debug, Error)]
pub enum RpcError {
    /// The node answered with a JSON-RPC error object
    #[error("rpc error {0}")]
    Node(RpcException),

    /// The request never produced a response
    #[error("HTTP error: {0}")]
    Transport(String),

    /// Non-success HTTP status without a JSON-RPC body
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body is not a JSON-RPC response
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl RpcError {
    /// Whether waiting and asking again may succeed.
    ///
    /// Node error objects describe node state ("address does not exist",
    /// "no information available yet") and are transient, except the
    /// JSON-RPC protocol codes. Transport and decoding failures are fatal.
    pub fn is_transient(&self) -> bool {
        match self {
            RpcError::Node(exception) => !exception.is_protocol_error(),
            RpcError::Transport(_) | RpcError::Status { .. } | RpcError::InvalidResponse(_) => false,
        }
    }

    /// The node error object, if the node produced one.
    pub fn exception(&self) -> Option<&RpcException> {
        match self {
            RpcError::Node(exception) => Some(exception),
            _ => None,
        }
    }
}

impl From<RpcException> for RpcError {
    fn from(exception: RpcException) -> Self {
        RpcError::Node(exception)
    }
}
