//! Candidate transaction sets.

use hayashi_common::Hash256;
use stellar_xdr::curr::{Limits, TransactionEnvelope, WriteXdr};

fn sort_txs_by_hash(txs: &mut [TransactionEnvelope]) {
    txs.sort_by(|a, b| {
        let hash_a = Hash256::hash_xdr(a).unwrap_or_default();
        let hash_b = Hash256::hash_xdr(b).unwrap_or_default();
        hash_a.0.cmp(&hash_b.0)
    });
}

/// A set of transactions proposed for a ledger.
///
/// The set is bound to the ledger it extends through the previous ledger
/// hash, and identified by a deterministic contents hash so peers can
/// agree on it by value.
#[derive(Debug, Clone)]
pub struct TransactionSet {
    /// Hash of this transaction set.
    pub hash: Hash256,
    /// Previous ledger hash.
    pub previous_ledger_hash: Hash256,
    /// Transactions in the set, ordered by envelope hash.
    pub transactions: Vec<TransactionEnvelope>,
}

impl TransactionSet {
    /// Compute the contents hash: SHA-256 over the previous ledger hash
    /// followed by each envelope's XDR encoding in set order.
    pub fn compute_contents_hash(
        previous_ledger_hash: Hash256,
        transactions: &[TransactionEnvelope],
    ) -> Option<Hash256> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&previous_ledger_hash.0);
        for tx in transactions {
            let bytes = tx.to_xdr(Limits::none()).ok()?;
            buf.extend_from_slice(&bytes);
        }
        Some(Hash256::hash(&buf))
    }

    /// Create a new transaction set with a computed hash.
    pub fn new(previous_ledger_hash: Hash256, transactions: Vec<TransactionEnvelope>) -> Self {
        let mut transactions = transactions;
        sort_txs_by_hash(&mut transactions);
        let hash = Self::compute_contents_hash(previous_ledger_hash, &transactions)
            .unwrap_or_default();

        Self {
            hash,
            previous_ledger_hash,
            transactions,
        }
    }

    /// Get the number of transactions.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
