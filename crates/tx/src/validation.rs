//! Transaction validity checks against a ledger snapshot.
//!
//! [`TransactionFrame::check_valid`] performs the checks a node makes
//! before accepting a transaction into its pending queue: structure,
//! fee floor, source and fee-source account existence, sequence number
//! continuity, and fee-source balance. Signature verification and
//! per-operation semantics are applied later, when the transaction is
//! executed in a closing ledger.

use hayashi_ledger::LedgerSnapshot;
use stellar_xdr::curr::TransactionResultResult;

use crate::frame::TransactionFrame;

impl TransactionFrame {
    /// Checks whether this transaction could be applied on top of the
    /// given snapshot.
    ///
    /// `current_seq` is the sequence number the transaction must follow;
    /// pass 0 to validate against the source account's on-ledger
    /// sequence number. On failure the frame's result slot records the
    /// rejection reason and `false` is returned; on success the result
    /// slot is reset.
    pub fn check_valid(&self, snapshot: &LedgerSnapshot, current_seq: i64) -> bool {
        if self.num_operations() == 0 {
            self.set_result_code(TransactionResultResult::TxMissingOperation);
            return false;
        }

        let min_fee = snapshot.base_fee() as i64 * self.num_operations().max(1) as i64;
        if self.fee_bid() < min_fee {
            self.set_result_code(TransactionResultResult::TxInsufficientFee);
            return false;
        }

        let source_id = self.source_id();
        let Some(source_account) = snapshot.get_account(&source_id) else {
            self.set_result_code(TransactionResultResult::TxNoAccount);
            return false;
        };

        let current = if current_seq == 0 {
            source_account.seq_num.0
        } else {
            current_seq
        };
        if self.is_bad_seq(current) {
            self.set_result_code(TransactionResultResult::TxBadSeq);
            return false;
        }

        let fee_source_id = self.fee_source_id();
        if snapshot.get_account(&fee_source_id).is_none() {
            self.set_result_code(TransactionResultResult::TxNoAccount);
            return false;
        }

        if snapshot.available_balance(&fee_source_id) < self.fee_bid() {
            self.set_result_code(TransactionResultResult::TxInsufficientBalance);
            return false;
        }

        self.reset_result();
        true
    }

    /// A sequence number is acceptable iff it directly follows `current`.
    fn is_bad_seq(&self, current: i64) -> bool {
        current == i64::MAX || self.seq_num() <= 0 || self.seq_num() != current + 1
    }
}
