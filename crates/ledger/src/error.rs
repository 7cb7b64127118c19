//! Ledger subsystem errors.

use thiserror::Error;

/// A type alias for `Result<T, LedgerError>`.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors from ledger state access.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// XDR encoding/decoding error.
    #[error("XDR error: {0}")]
    Xdr(#[from] stellar_xdr::curr::Error),

    /// Serialization error while keying an entry.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Snapshot construction error.
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}
