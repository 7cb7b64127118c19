//! Shared primitive types for the hayashi node.
//!
//! This crate holds the small set of types every other crate in the
//! workspace depends on: the 32-byte [`Hash256`] value, the
//! [`NetworkId`] derived from a network passphrase, protocol-version
//! gating helpers, and the common error type.

pub mod error;
pub mod network;
pub mod protocol;
pub mod types;

pub use error::{Error, Result};
pub use network::NetworkId;
pub use types::Hash256;
