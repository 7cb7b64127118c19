//! Ledger state views for the hayashi node.
//!
//! This crate provides the read-only surfaces other subsystems consume:
//! [`LedgerSnapshot`], a point-in-time view of ledger state used for
//! transaction validation, and [`LastClosedLedger`], the header of the
//! most recently closed ledger.

pub mod error;
pub mod header;
pub mod snapshot;

pub use error::{LedgerError, Result};
pub use header::{starting_sequence_number, LastClosedLedger};
pub use snapshot::{default_header, LedgerSnapshot, SnapshotBuilder};
