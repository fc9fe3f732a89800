//! Error types for the RPC client.

use ledgerlink_core::{CoreError, ErrorKind};
use thiserror::Error;

/// Errors that can occur during RPC operations.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The service answered with a non-success HTTP status.
    #[error("transport error: HTTP {status}: {body}")]
    Transport { status: u16, body: String },

    /// The request never produced a response (connect, timeout, I/O).
    #[error("transport I/O error: {0}")]
    Io(String),

    /// The service returned a JSON-RPC error object.
    #[error("remote rejected request: {message}")]
    RemoteRejected { code: Option<i64>, message: String },

    /// The response body did not have the expected structure.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Encoding or decoding of payload bytes failed.
    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

impl RpcError {
    /// The error's classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RpcError::Transport { .. } | RpcError::Io(_) => ErrorKind::Transport,
            RpcError::RemoteRejected { .. } => ErrorKind::RemoteRejected,
            RpcError::MalformedResponse(_) => ErrorKind::Malformed,
            RpcError::Core(e) => e.kind(),
        }
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        RpcError::MalformedResponse(msg.into())
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(e: serde_json::Error) -> Self {
        RpcError::MalformedResponse(e.to_string())
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(e: reqwest::Error) -> Self {
        RpcError::Io(e.to_string())
    }
}

/// Result type for RPC operations.
pub type Result<T> = std::result::Result<T, RpcError>;
