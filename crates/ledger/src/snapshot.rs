//! Point-in-time snapshots of ledger state.
//!
//! A [`LedgerSnapshot`] is a consistent, read-only view of the ledger at
//! a specific sequence number: the header plus a cache of entries keyed
//! by XDR-encoded `LedgerKey`. Snapshots are immutable after creation;
//! consumers open one, read what they need, and drop it.
//!
//! [`SnapshotBuilder`] provides a fluent API for constructing snapshots
//! programmatically, which is how tests seed account state.

use std::collections::HashMap;

use hayashi_common::protocol::{protocol_version_starts_from, LIABILITIES_PROTOCOL_VERSION};
use hayashi_common::Hash256;
use stellar_xdr::curr::{
    AccountEntry, AccountEntryExt, AccountId, LedgerEntry, LedgerEntryData, LedgerEntryExt,
    LedgerHeader, LedgerKey, LedgerKeyAccount, Limits, WriteXdr,
};

use crate::{LedgerError, Result};

/// Serialize a ledger key to bytes for use as a map key.
fn key_to_bytes(key: &LedgerKey) -> Result<Vec<u8>> {
    key.to_xdr(Limits::none())
        .map_err(|e| LedgerError::Serialization(e.to_string()))
}

fn account_key(account_id: &AccountId) -> LedgerKey {
    LedgerKey::Account(LedgerKeyAccount {
        account_id: account_id.clone(),
    })
}

/// A point-in-time snapshot of ledger state.
///
/// Provides the header and entry lookups against a frozen view. The
/// entry cache may be a subset of the full ledger state; entries absent
/// from the cache read as non-existent.
#[derive(Debug, Clone)]
pub struct LedgerSnapshot {
    /// The ledger sequence number this snapshot represents.
    ledger_seq: u32,

    /// The complete ledger header at this sequence.
    header: LedgerHeader,

    /// SHA-256 hash of the XDR-encoded header.
    header_hash: Hash256,

    /// Cached entries keyed by XDR-encoded LedgerKey.
    entries: HashMap<Vec<u8>, LedgerEntry>,
}

impl LedgerSnapshot {
    /// Create a new snapshot from a header and entries.
    pub fn new(
        header: LedgerHeader,
        header_hash: Hash256,
        entries: HashMap<Vec<u8>, LedgerEntry>,
    ) -> Self {
        Self {
            ledger_seq: header.ledger_seq,
            header,
            header_hash,
            entries,
        }
    }

    /// Get the ledger sequence of this snapshot.
    pub fn ledger_seq(&self) -> u32 {
        self.ledger_seq
    }

    /// Get the ledger header.
    pub fn header(&self) -> &LedgerHeader {
        &self.header
    }

    /// Get the ledger header hash.
    pub fn header_hash(&self) -> &Hash256 {
        &self.header_hash
    }

    /// Get the protocol version.
    pub fn protocol_version(&self) -> u32 {
        self.header.ledger_version
    }

    /// Get the base fee.
    pub fn base_fee(&self) -> u32 {
        self.header.base_fee
    }

    /// Get the base reserve.
    pub fn base_reserve(&self) -> u32 {
        self.header.base_reserve
    }

    /// Look up an entry by key.
    pub fn get_entry(&self, key: &LedgerKey) -> Result<Option<&LedgerEntry>> {
        let key_bytes = key_to_bytes(key)?;
        Ok(self.entries.get(&key_bytes))
    }

    /// Look up an account by ID.
    ///
    /// Account keys always encode, so the lookup itself is infallible;
    /// a missing or non-account entry reads as `None`.
    pub fn get_account(&self, account_id: &AccountId) -> Option<&AccountEntry> {
        let key_bytes = account_key(account_id)
            .to_xdr(Limits::none())
            .unwrap_or_default();
        match self.entries.get(&key_bytes) {
            Some(LedgerEntry {
                data: LedgerEntryData::Account(account),
                ..
            }) => Some(account),
            _ => None,
        }
    }

    /// The minimum balance an account with `num_sub_entries` sub-entries
    /// must hold.
    pub fn minimum_balance(&self, num_sub_entries: u32) -> i64 {
        (2 + num_sub_entries as i64) * self.base_reserve() as i64
    }

    /// The balance an account can spend on fees: its balance minus the
    /// reserve and, from protocol 10 on, minus selling liabilities.
    ///
    /// An unknown account has no available balance.
    pub fn available_balance(&self, account_id: &AccountId) -> i64 {
        let Some(account) = self.get_account(account_id) else {
            return 0;
        };
        let mut available = account.balance - self.minimum_balance(account.num_sub_entries);
        if protocol_version_starts_from(self.protocol_version(), LIABILITIES_PROTOCOL_VERSION) {
            if let AccountEntryExt::V1(ref ext) = account.ext {
                available -= ext.liabilities.selling;
            }
        }
        available.max(0)
    }

    /// Get the number of cached entries.
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }
}

/// Fluent builder for constructing [`LedgerSnapshot`] instances.
///
/// # Example
///
/// ```ignore
/// let snapshot = SnapshotBuilder::new(ledger_seq)
///     .with_header(header, header_hash)
///     .add_account(account_entry)
///     .build()?;
/// ```
pub struct SnapshotBuilder {
    /// Target ledger sequence.
    ledger_seq: u32,
    /// Optional header (required for build, defaulted by
    /// build_with_default_header).
    header: Option<LedgerHeader>,
    /// Hash of the header.
    header_hash: Hash256,
    /// Preloaded entries.
    entries: HashMap<Vec<u8>, LedgerEntry>,
}

impl SnapshotBuilder {
    /// Create a new builder for a given ledger sequence.
    pub fn new(ledger_seq: u32) -> Self {
        Self {
            ledger_seq,
            header: None,
            header_hash: Hash256::ZERO,
            entries: HashMap::new(),
        }
    }

    /// Set the ledger header.
    pub fn with_header(mut self, header: LedgerHeader, hash: Hash256) -> Self {
        self.header = Some(header);
        self.header_hash = hash;
        self
    }

    /// Add an entry to the snapshot.
    pub fn add_entry(mut self, key: LedgerKey, entry: LedgerEntry) -> Result<Self> {
        let key_bytes = key_to_bytes(&key)?;
        self.entries.insert(key_bytes, entry);
        Ok(self)
    }

    /// Add an account entry to the snapshot under its account key.
    pub fn add_account(mut self, account: AccountEntry) -> Self {
        let key_bytes = account_key(&account.account_id)
            .to_xdr(Limits::none())
            .unwrap_or_default();
        let entry = LedgerEntry {
            last_modified_ledger_seq: self.ledger_seq,
            data: LedgerEntryData::Account(account),
            ext: LedgerEntryExt::V0,
        };
        self.entries.insert(key_bytes, entry);
        self
    }

    /// Build the snapshot.
    pub fn build(self) -> Result<LedgerSnapshot> {
        let header = self
            .header
            .ok_or_else(|| LedgerError::Snapshot("header not set".to_string()))?;

        Ok(LedgerSnapshot {
            ledger_seq: self.ledger_seq,
            header,
            header_hash: self.header_hash,
            entries: self.entries,
        })
    }

    /// Build the snapshot with a default header (for testing).
    pub fn build_with_default_header(self) -> LedgerSnapshot {
        let header = self
            .header
            .unwrap_or_else(|| default_header(self.ledger_seq));

        LedgerSnapshot {
            ledger_seq: self.ledger_seq,
            header,
            header_hash: self.header_hash,
            entries: self.entries,
        }
    }
}

/// A plain header with typical parameters, for tests and genesis-like
/// state.
pub fn default_header(ledger_seq: u32) -> LedgerHeader {
    LedgerHeader {
        ledger_version: 13,
        previous_ledger_hash: stellar_xdr::curr::Hash([0u8; 32]),
        scp_value: stellar_xdr::curr::StellarValue {
            tx_set_hash: stellar_xdr::curr::Hash([0u8; 32]),
            close_time: stellar_xdr::curr::TimePoint(0),
            upgrades: stellar_xdr::curr::VecM::default(),
            ext: stellar_xdr::curr::StellarValueExt::Basic,
        },
        tx_set_result_hash: stellar_xdr::curr::Hash([0u8; 32]),
        bucket_list_hash: stellar_xdr::curr::Hash([0u8; 32]),
        ledger_seq,
        total_coins: 100_000_000_000_000_000,
        fee_pool: 0,
        inflation_seq: 0,
        id_pool: 0,
        base_fee: 100,
        base_reserve: 5_000_000,
        max_tx_set_size: 1000,
        skip_list: std::array::from_fn(|_| stellar_xdr::curr::Hash([0u8; 32])),
        ext: stellar_xdr::curr::LedgerHeaderExt::V0,
    }
}
