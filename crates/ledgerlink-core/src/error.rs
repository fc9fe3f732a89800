//! Error types for ledgerlink core.

use std::fmt;

use thiserror::Error;

/// Coarse classification shared by every ledgerlink error.
///
/// Callers branch on the kind rather than on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Decode input violates shape or length expectations.
    Malformed,
    /// Hex/text input violates the expected format.
    InvalidEncoding,
    /// Key generation or signing context could not be set up.
    CryptoInit,
    /// The signing primitive failed.
    CryptoOp,
    /// Non-success status or I/O failure reaching the remote service.
    Transport,
    /// The remote service understood the request and returned an error.
    RemoteRejected,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Malformed => "malformed",
            ErrorKind::InvalidEncoding => "invalid encoding",
            ErrorKind::CryptoInit => "crypto init",
            ErrorKind::CryptoOp => "crypto op",
            ErrorKind::Transport => "transport",
            ErrorKind::RemoteRejected => "remote rejected",
        };
        f.write_str(name)
    }
}

/// Errors raised by the codec and key modules.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed input: {0}")]
    Malformed(String),

    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("crypto initialization failed: {0}")]
    CryptoInit(String),

    #[error("crypto operation failed: {0}")]
    CryptoOp(String),
}

impl CoreError {
    /// The error's classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Malformed(_) => ErrorKind::Malformed,
            CoreError::InvalidEncoding(_) => ErrorKind::InvalidEncoding,
            CoreError::CryptoInit(_) => ErrorKind::CryptoInit,
            CoreError::CryptoOp(_) => ErrorKind::CryptoOp,
        }
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        CoreError::Malformed(msg.into())
    }
}

impl From<hex::FromHexError> for CoreError {
    fn from(e: hex::FromHexError) -> Self {
        CoreError::InvalidEncoding(e.to_string())
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
