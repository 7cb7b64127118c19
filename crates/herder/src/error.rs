//! Herder subsystem errors.

use thiserror::Error;

/// A type alias for `Result<T, HerderError>`.
pub type Result<T> = std::result::Result<T, HerderError>;

/// Errors from herder operations.
#[derive(Error, Debug)]
pub enum HerderError {
    /// XDR encoding/decoding error.
    #[error("XDR error: {0}")]
    Xdr(#[from] stellar_xdr::curr::Error),

    /// Transaction frame error.
    #[error("Transaction error: {0}")]
    Tx(#[from] hayashi_tx::TxError),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
