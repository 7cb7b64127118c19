//! Views of the last closed ledger header.

use hayashi_common::Hash256;
use stellar_xdr::curr::LedgerHeader;

/// The most recently closed ledger: its header plus the hash consensus
/// externalized for it.
#[derive(Debug, Clone)]
pub struct LastClosedLedger {
    /// Hash of the closed ledger header.
    pub hash: Hash256,
    /// The closed ledger header.
    pub header: LedgerHeader,
}

impl LastClosedLedger {
    /// The sequence number of the closed ledger.
    pub fn ledger_seq(&self) -> u32 {
        self.header.ledger_seq
    }

    /// The protocol version the ledger was closed under.
    pub fn ledger_version(&self) -> u32 {
        self.header.ledger_version
    }
}

/// The smallest sequence number an account created in `ledger_seq` can
/// use.
///
/// New accounts start at `ledger_seq << 32`, so this value also
/// partitions an account's transactions between those that can apply in
/// the current ledger and those that must wait for the next one.
pub fn starting_sequence_number(ledger_seq: u32) -> i64 {
    (ledger_seq as i64) << 32
}
