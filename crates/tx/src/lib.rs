//! Transaction frames and validity checks.
//!
//! This crate wraps raw XDR transaction envelopes in a
//! [`TransactionFrame`] that exposes the properties the rest of the node
//! cares about: hashes, the sequence-number-owning source account, the
//! fee-paying account, the fee bid, and a mutable result slot carrying
//! the user-visible outcome of validation.
//!
//! Frames are shared by handle ([`TransactionFramePtr`]): the pending
//! queue, broadcast indexes, and consensus all hold the same frame, so a
//! result code set during validation is visible everywhere.

pub mod bridge;
pub mod error;
pub mod frame;
mod validation;

pub use bridge::convert_for_v13;
pub use error::{Result, TxError};
pub use frame::{muxed_to_account_id, TransactionFrame, TransactionFramePtr};
