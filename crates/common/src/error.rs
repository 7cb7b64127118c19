//! Common error types.
//!
//! This module provides the unified error type [`enum@Error`] and the
//! convenience alias [`Result`] used by the workspace crates for
//! cross-cutting failures. Subsystems with richer failure modes define
//! their own error enums and convert into this one at the boundary.

use thiserror::Error;

/// A type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for node operations.
#[derive(Error, Debug)]
pub enum Error {
    /// XDR encoding/decoding error.
    #[error("XDR error: {0}")]
    Xdr(#[from] stellar_xdr::curr::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid data error.
    ///
    /// Occurs when data fails validation (wrong format, out of range, etc.).
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Resource not found error.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation failed error.
    ///
    /// A catch-all for operations that fail for reasons not covered by
    /// other variants.
    #[error("Operation failed: {0}")]
    OperationFailed(String),
}
