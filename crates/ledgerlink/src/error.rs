//! Unified error type for the ledgerlink API.

use ledgerlink_core::{CoreError, ErrorKind};
use ledgerlink_rpc::RpcError;
use thiserror::Error;

/// Errors surfaced by the ledgerlink facade.
#[derive(Debug, Error)]
pub enum Error {
    /// Encoding, decoding or key handling failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A ledger call failed.
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// The blocking client could not start its runtime.
    #[error("runtime error: {0}")]
    Runtime(String),
}

impl Error {
    /// The error's classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Core(e) => e.kind(),
            Error::Rpc(e) => e.kind(),
            Error::Runtime(_) => ErrorKind::Transport,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Runtime(e.to_string())
    }
}

/// Result type for ledgerlink operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_passes_through() {
        let err: Error = CoreError::CryptoInit("no entropy".into()).into();
        assert_eq!(err.kind(), ErrorKind::CryptoInit);

        let err: Error = RpcError::RemoteRejected {
            code: Some(-1),
            message: "nope".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::RemoteRejected);

        let err: Error = RpcError::Core(CoreError::InvalidEncoding("x".into())).into();
        assert_eq!(err.kind(), ErrorKind::InvalidEncoding);
    }

    #[test]
    fn test_runtime_failure_is_transport() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::Other, "no threads").into();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.to_string().contains("no threads"));
    }
}
