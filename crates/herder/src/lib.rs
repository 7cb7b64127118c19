//! Herder components for the hayashi node.
//!
//! The herder mediates between the overlay and consensus: it collects
//! candidate transactions from users and peers, keeps them in the
//! pending [`TransactionQueue`], and produces [`TransactionSet`]s for
//! the next ledger. This crate holds the queue itself; the surrounding
//! consensus driver lives with the host application.

pub mod error;
pub mod metrics;
pub mod tx_queue;

pub use error::{HerderError, Result};
pub use metrics::{Counter, TxQueueMetrics};
pub use tx_queue::{
    AccountTxQueueInfo, AddResult, LedgerStateProvider, ReplacedTransaction, TransactionQueue,
    TransactionSet, TxQueueConfig,
};
