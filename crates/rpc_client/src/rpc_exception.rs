use std::fmt;
use thiserror::Error;

/// Parse error
pub const PARSE_ERROR: i32 = -32700;
/// Invalid request
pub const INVALID_REQUEST: i32 = -32600;
/// Method not found
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Invalid params
pub const INVALID_PARAMS: i32 = -32602;
/// Internal error
pub const INTERNAL_ERROR: i32 = -32603;

/// Error object returned by the node
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct RpcException {
    /// JSON-RPC error code
    pub code: i32,

    /// Error message
    pub message: String,
}

impl RpcException {
    /// Creates a new RPC exception
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Whether the code is one of the JSON-RPC protocol errors.
    ///
    /// These describe a malformed exchange rather than node state and do not
    /// go away by asking again.
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self.code,
            PARSE_ERROR | INVALID_REQUEST | METHOD_NOT_FOUND | INVALID_PARAMS | INTERNAL_ERROR
        )
    }
}

impl fmt::Display for RpcException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}
