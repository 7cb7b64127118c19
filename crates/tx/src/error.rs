//! Transaction subsystem errors.

use thiserror::Error;

/// A type alias for `Result<T, TxError>`.
pub type Result<T> = std::result::Result<T, TxError>;

/// Errors from transaction frame construction and inspection.
#[derive(Error, Debug)]
pub enum TxError {
    /// XDR encoding/decoding error.
    #[error("XDR error: {0}")]
    Xdr(#[from] stellar_xdr::curr::Error),

    /// Malformed envelope error.
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
