//! Pending transaction queue.
//!
//! The transaction queue holds candidate transactions submitted by users
//! and peers until they are included in a ledger. It is the herder's
//! buffer between the overlay and consensus.
//!
//! # Overview
//!
//! The [`TransactionQueue`] tracks one [`AccountState`] record per
//! account it has seen, covering two distinct roles an account can play:
//!
//! - **Sequence-number source**: the account owns an ordered run of
//!   queued transactions with strictly consecutive sequence numbers.
//! - **Fee source**: the account pays fees for queued transactions,
//!   which may belong to *other* accounts when fee-bump envelopes are
//!   involved. `total_fees` accumulates everything the account has
//!   committed to pay so admission can check balances across the whole
//!   queue.
//!
//! # Admission
//!
//! [`TransactionQueue::try_add`] deduplicates against queued
//! transactions, applies replace-by-fee for fee-bump envelopes (a
//! replacement must out-bid the queued transaction by
//! [`TransactionQueue::FEE_MULTIPLIER`] per operation), enforces a
//! global operation budget derived from the ledger's capacity, validates
//! against a fresh ledger snapshot, and checks that the fee source can
//! cover every fee it has bid across the queue.
//!
//! # Per-ledger maintenance
//!
//! After each ledger close the host calls, in order:
//! [`TransactionQueue::maybe_version_upgraded`],
//! [`TransactionQueue::remove_applied`] with the transactions the ledger
//! applied, and [`TransactionQueue::shift`]. `shift` advances every
//! account's age; an account whose transactions have waited
//! `pending_depth` ledgers has them banned. Banned hashes live in a ring
//! of sets, one per ledger, so a ban lasts `ban_depth` ledgers and then
//! lapses.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use tracing::debug;

use hayashi_common::protocol::{needs_upgrade_to_version, FEE_BUMP_PROTOCOL_VERSION};
use hayashi_common::{Hash256, NetworkId};
use hayashi_ledger::{starting_sequence_number, LastClosedLedger, LedgerSnapshot};
use hayashi_tx::{convert_for_v13, TransactionFrame, TransactionFramePtr};
use stellar_xdr::curr::{AccountId, EnvelopeType, Limits, TransactionResultResult, WriteXdr};

use crate::metrics::TxQueueMetrics;
use crate::Result;

mod tx_set;
pub use tx_set::TransactionSet;

/// Result of attempting to add a transaction to the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddResult {
    /// Transaction was admitted (or accepted as a replacement).
    Pending,
    /// Transaction is already queued.
    Duplicate,
    /// Transaction was rejected; the frame's result records the reason.
    Error,
    /// Transaction is banned or the queue is out of capacity. The
    /// submitter should retry after a few ledgers.
    TryAgainLater,
}

/// Host-provided view of ledger state.
///
/// The queue reads the last closed header for capacity and version
/// decisions, and opens a short-lived read snapshot to validate each
/// candidate transaction.
pub trait LedgerStateProvider: Send + Sync {
    /// The most recently closed ledger.
    fn last_closed_header(&self) -> LastClosedLedger;

    /// The operation capacity of the last closed ledger's transaction
    /// set.
    fn last_max_tx_set_size_ops(&self) -> u32;

    /// A read-only snapshot of current ledger state.
    fn open_read_snapshot(&self) -> LedgerSnapshot;
}

/// Configuration for the transaction queue.
#[derive(Debug, Clone)]
pub struct TxQueueConfig {
    /// Number of ledgers a transaction may stay pending before it is
    /// banned.
    pub pending_depth: u32,
    /// Number of ledgers a banned transaction stays banned.
    pub ban_depth: u32,
    /// The queue's operation budget as a multiple of the ledger's
    /// operation capacity.
    pub pool_ledger_multiplier: u32,
    /// Network the queue validates and rebuilds envelopes for.
    pub network_id: NetworkId,
}

impl Default for TxQueueConfig {
    fn default() -> Self {
        Self {
            pending_depth: 4,
            ban_depth: 10,
            pool_ledger_multiplier: 2,
            network_id: NetworkId::testnet(),
        }
    }
}

/// Account states are keyed by the XDR encoding of the account id.
type AccountKey = Vec<u8>;

pub(crate) fn account_key_from_account_id(account_id: &AccountId) -> AccountKey {
    account_id.to_xdr(Limits::none()).unwrap_or_default()
}

/// Per-account record in the queue.
///
/// An entry exists iff the account has queued transactions or is the fee
/// source for at least one queued transaction elsewhere in the queue.
#[derive(Debug, Default)]
struct AccountState {
    /// Queued transactions for which this account is the
    /// sequence-number source, ordered by strictly consecutive sequence
    /// number.
    transactions: Vec<TransactionFramePtr>,
    /// Sum of fee bids across the queue charged to this account,
    /// including transactions queued under other accounts.
    total_fees: i64,
    /// Sum of operations over `transactions`.
    queue_size_ops: u32,
    /// Ledgers since one of this account's transactions was last
    /// applied. Always 0 while `transactions` is empty.
    age: u32,
}

/// Queue-facing summary of one account's standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccountTxQueueInfo {
    /// Highest queued sequence number, or 0 with an empty queue.
    pub max_seq: i64,
    /// Fees the account has committed to pay across the queue.
    pub total_fees: i64,
    /// Operations queued under this account.
    pub queue_size_ops: u32,
    /// Current age bucket.
    pub age: u32,
}

/// A queued transaction handle replaced during a protocol upgrade.
///
/// External indexes keyed by hash use these pairs to rebind their
/// entries.
#[derive(Debug, Clone)]
pub struct ReplacedTransaction {
    /// The handle previously held by the queue.
    pub old: TransactionFramePtr,
    /// The handle now held in its place.
    pub new: TransactionFramePtr,
}

/// Locates `seq` in a run of consecutively numbered transactions.
///
/// Returns the position holding `seq` when `first <= seq <= last`, the
/// one-past-the-end position when `seq == last + 1`, and `None` when
/// `seq` falls outside that window. Positions are computable directly
/// because the run has no gaps.
fn find_by_seq(seq: i64, transactions: &[TransactionFramePtr]) -> Option<usize> {
    let first_seq = transactions.first()?.seq_num();
    let last_seq = transactions[transactions.len() - 1].seq_num();
    if seq < first_seq || seq > last_seq + 1 {
        return None;
    }

    let pos = (seq - first_seq) as usize;
    debug_assert!(pos <= transactions.len());
    debug_assert!(pos == transactions.len() || transactions[pos].seq_num() == seq);
    Some(pos)
}

/// Two submissions name the same transaction when their envelopes hash
/// identically, or when a queued fee-bump wraps exactly the envelope
/// being submitted.
fn is_duplicate_tx(old_tx: &TransactionFrame, new_tx: &TransactionFrame) -> bool {
    if old_tx.envelope_type() == new_tx.envelope_type() {
        old_tx.full_hash() == new_tx.full_hash()
    } else if old_tx.envelope_type() == EnvelopeType::TxFeeBump {
        old_tx.inner_full_hash() == Some(new_tx.full_hash())
    } else {
        false
    }
}

/// Whether `tx` out-bids `old_tx` per operation by the required
/// multiplier.
fn can_replace_by_fee(tx: &TransactionFrame, old_tx: &TransactionFrame) -> bool {
    let new_fee = tx.fee_bid() as i128;
    let new_num_ops = tx.num_operations().max(1) as i128;
    let old_fee = old_tx.fee_bid() as i128;
    let old_num_ops = old_tx.num_operations().max(1) as i128;

    // newFee / newNumOps >= FEE_MULTIPLIER * oldFee / oldNumOps
    // is evaluated cross-multiplied in 128 bits: fees are bounded by
    // i64::MAX while operation counts and the multiplier are small.
    new_fee * old_num_ops >= TransactionQueue::FEE_MULTIPLIER as i128 * old_fee * new_num_ops
}

/// Queue of pending transactions.
pub struct TransactionQueue {
    /// Ledger state access for headers, capacity, and validation
    /// snapshots.
    ledger: Arc<dyn LedgerStateProvider>,
    /// Number of age buckets; an account reaching the last one has its
    /// queue banned.
    pending_depth: u32,
    /// Queue operation budget as a multiple of the ledger's capacity.
    pool_ledger_multiplier: u32,
    /// Network envelopes are validated and rebuilt for.
    network_id: NetworkId,
    /// Per-account queues and fee accounting.
    account_states: HashMap<AccountKey, AccountState>,
    /// Recently banned hashes; the front set belongs to the current
    /// ledger, the back set is about to lapse.
    banned_transactions: VecDeque<HashSet<Hash256>>,
    /// Protocol version of the last closed ledger the queue has seen.
    ledger_version: u32,
    /// Total operations across all queued transactions.
    queue_size_ops: u32,
    /// Per-age gauges.
    metrics: Arc<TxQueueMetrics>,
}

impl TransactionQueue {
    /// A replacement must bid at least this multiple of the queued
    /// transaction's fee rate.
    pub const FEE_MULTIPLIER: i64 = 10;

    /// Create a new queue with a fresh metrics sink.
    pub fn new(config: TxQueueConfig, ledger: Arc<dyn LedgerStateProvider>) -> Self {
        let metrics = Arc::new(TxQueueMetrics::new(config.pending_depth));
        Self::with_metrics(config, ledger, metrics)
    }

    /// Create a new queue reporting into an existing metrics sink.
    pub fn with_metrics(
        config: TxQueueConfig,
        ledger: Arc<dyn LedgerStateProvider>,
        metrics: Arc<TxQueueMetrics>,
    ) -> Self {
        assert!(config.pending_depth > 0, "pending depth must be positive");
        assert!(config.ban_depth > 0, "ban depth must be positive");
        assert_eq!(
            metrics.depth(),
            config.pending_depth as usize,
            "metrics sink must have one gauge per age bucket"
        );

        let ledger_version = ledger.last_closed_header().header.ledger_version;
        let mut banned_transactions = VecDeque::with_capacity(config.ban_depth as usize);
        for _ in 0..config.ban_depth {
            banned_transactions.push_back(HashSet::new());
        }

        Self {
            ledger,
            pending_depth: config.pending_depth,
            pool_ledger_multiplier: config.pool_ledger_multiplier,
            network_id: config.network_id,
            account_states: HashMap::new(),
            banned_transactions,
            ledger_version,
            queue_size_ops: 0,
            metrics,
        }
    }

    /// The queue's operation budget, re-read from the ledger so capacity
    /// upgrades take effect immediately.
    pub fn max_queue_size_ops(&self) -> u64 {
        self.ledger.last_max_tx_set_size_ops() as u64 * self.pool_ledger_multiplier as u64
    }

    /// Total operations currently queued.
    pub fn queue_size_ops(&self) -> u32 {
        self.queue_size_ops
    }

    /// The queue's metrics sink.
    pub fn metrics(&self) -> &Arc<TxQueueMetrics> {
        &self.metrics
    }

    /// Decides whether `tx` can enter the queue, without mutating any
    /// account state. Returns the position of the transaction being
    /// replaced, if this is a replace-by-fee.
    ///
    /// The only side effects are result codes recorded on `tx` and, on
    /// capacity rejection, the banning of `tx`'s hash.
    fn can_add(&mut self, tx: &TransactionFramePtr) -> (AddResult, Option<usize>) {
        if self.is_banned(&tx.full_hash()) {
            return (AddResult::TryAgainLater, None);
        }

        let mut net_fee = tx.fee_bid();
        let mut net_ops = tx.num_operations() as i64;
        let mut seq_num_for_validation = 0i64;
        let mut old_tx_index = None;

        let source_key = account_key_from_account_id(&tx.source_id());
        if let Some(state) = self.account_states.get(&source_key) {
            let transactions = &state.transactions;
            if !transactions.is_empty() {
                if tx.envelope_type() != EnvelopeType::TxFeeBump {
                    if let Some(pos) = find_by_seq(tx.seq_num(), transactions) {
                        if pos < transactions.len() && is_duplicate_tx(&transactions[pos], tx) {
                            return (AddResult::Duplicate, None);
                        }
                    }
                    // Only an extension of the queued run is acceptable;
                    // the validator enforces seq == back + 1.
                    seq_num_for_validation = transactions[transactions.len() - 1].seq_num();
                } else {
                    match find_by_seq(tx.seq_num(), transactions) {
                        None => {
                            tx.set_result_code(TransactionResultResult::TxBadSeq);
                            return (AddResult::Error, None);
                        }
                        Some(pos) if pos < transactions.len() => {
                            // Occupied slot: this is a replace-by-fee
                            // attempt.
                            let old_tx = &transactions[pos];
                            if is_duplicate_tx(old_tx, tx) {
                                return (AddResult::Duplicate, None);
                            }

                            if !can_replace_by_fee(tx, old_tx) {
                                tx.set_result_code(TransactionResultResult::TxInsufficientFee);
                                return (AddResult::Error, None);
                            }

                            net_ops -= old_tx.num_operations() as i64;
                            if old_tx.fee_source_id() == tx.fee_source_id() {
                                net_fee -= old_tx.fee_bid();
                            }
                            old_tx_index = Some(pos);
                            seq_num_for_validation = tx.seq_num() - 1;
                        }
                        Some(_) => {
                            // One past the back: a new slot.
                            seq_num_for_validation = tx.seq_num() - 1;
                        }
                    }
                }
            }
        }

        if net_ops as i128 + self.queue_size_ops as i128 > self.max_queue_size_ops() as i128 {
            // Over the operation budget. Ban the hash so immediate
            // resubmissions back off until the ring rotates; the
            // transaction is not queued, so no accounting changes.
            self.ban(std::slice::from_ref(tx));
            return (AddResult::TryAgainLater, None);
        }

        let snapshot = self.ledger.open_read_snapshot();
        if !tx.check_valid(&snapshot, seq_num_for_validation) {
            return (AddResult::Error, None);
        }

        // The fee source is not necessarily the sequence-number source.
        // Everything it has already bid across the queue stays reserved.
        let fee_source_key = account_key_from_account_id(&tx.fee_source_id());
        let total_fees = self
            .account_states
            .get(&fee_source_key)
            .map(|state| state.total_fees)
            .unwrap_or(0);
        let available = snapshot.available_balance(&tx.fee_source_id());
        if available.saturating_sub(net_fee) < total_fees {
            tx.set_result_code(TransactionResultResult::TxInsufficientBalance);
            return (AddResult::Error, None);
        }

        (AddResult::Pending, old_tx_index)
    }

    /// Try to add a transaction to the queue.
    pub fn try_add(&mut self, tx: TransactionFramePtr) -> AddResult {
        let (res, old_tx_index) = self.can_add(&tx);
        if res != AddResult::Pending {
            return res;
        }

        let source_key = account_key_from_account_id(&tx.source_id());
        if let Some(pos) = old_tx_index {
            // Replace-by-fee: retire the old transaction's fee and ops,
            // then take over its slot. The state cannot disappear here
            // because it still holds the slot being replaced.
            let old_tx = self.account_states[&source_key].transactions[pos].clone();
            self.release_fee_maybe_erase(&old_tx);
            let state = self
                .account_states
                .get_mut(&source_key)
                .expect("account state with a queued transaction");
            state.queue_size_ops -= old_tx.num_operations();
            self.queue_size_ops -= old_tx.num_operations();
            state.transactions[pos] = tx.clone();
            state.queue_size_ops += tx.num_operations();
        } else {
            let state = self.account_states.entry(source_key).or_default();
            state.transactions.push(tx.clone());
            self.metrics.pending_by_age(state.age).inc();
            state.queue_size_ops += tx.num_operations();
        }
        self.queue_size_ops += tx.num_operations();

        let fee_source_key = account_key_from_account_id(&tx.fee_source_id());
        let fee_state = self.account_states.entry(fee_source_key).or_default();
        fee_state.total_fees += tx.fee_bid();

        AddResult::Pending
    }

    /// Returns a dropped transaction's fee bid to its fee source,
    /// erasing the fee source's state when nothing else keeps it alive.
    ///
    /// The fee must have been charged to that state when the transaction
    /// was admitted; anything else is broken fee accounting and halts
    /// the process.
    fn release_fee_maybe_erase(&mut self, tx: &TransactionFramePtr) {
        let fee_source_key = account_key_from_account_id(&tx.fee_source_id());
        let erase = {
            let state = self
                .account_states
                .get_mut(&fee_source_key)
                .expect("fee released for an account with no state");
            assert!(
                state.total_fees >= tx.fee_bid(),
                "fee released exceeds fees charged to the account"
            );
            state.total_fees -= tx.fee_bid();
            state.transactions.is_empty() && state.total_fees == 0
        };
        if erase {
            self.account_states.remove(&fee_source_key);
        }
    }

    /// Erases the half-open run `range` from an account's queue,
    /// releasing each dropped transaction's fee and operation
    /// accounting.
    ///
    /// Fee releases can erase *other* account states, and the state
    /// named by `account_key` is itself erased when the drop leaves it
    /// with no transactions and no tracked fees. Callers must re-resolve
    /// by key any state they still need afterwards.
    fn drop_transactions(&mut self, account_key: &AccountKey, range: std::ops::Range<usize>) {
        if range.is_empty() {
            return;
        }

        let dropped: Vec<TransactionFramePtr> = match self.account_states.get_mut(account_key) {
            Some(state) => state.transactions.drain(range).collect(),
            None => return,
        };

        for tx in &dropped {
            if let Some(state) = self.account_states.get_mut(account_key) {
                state.queue_size_ops -= tx.num_operations();
            }
            self.queue_size_ops -= tx.num_operations();
            self.release_fee_maybe_erase(tx);
        }

        let erase = match self.account_states.get_mut(account_key) {
            Some(state) if state.transactions.is_empty() => {
                if state.total_fees == 0 {
                    true
                } else {
                    state.age = 0;
                    false
                }
            }
            _ => false,
        };
        if erase {
            self.account_states.remove(account_key);
        }
    }

    /// Drops queued transactions that a closed ledger has made
    /// unusable.
    ///
    /// Removal goes by sequence number, not hash: once the ledger has
    /// applied a sequence number for an account, every queued
    /// transaction at or below it has either been applied or can no
    /// longer apply.
    pub fn remove_applied(&mut self, applied: &[TransactionFramePtr]) {
        // Highest applied sequence number per source account.
        let mut max_seq_by_account: HashMap<AccountKey, i64> = HashMap::new();
        for tx in applied {
            let entry = max_seq_by_account
                .entry(account_key_from_account_id(&tx.source_id()))
                .or_insert(0);
            *entry = (*entry).max(tx.seq_num());
        }

        for (account_key, max_seq) in max_seq_by_account {
            let Some(state) = self.account_states.get_mut(&account_key) else {
                continue;
            };
            if state.transactions.is_empty() || state.transactions[0].seq_num() > max_seq {
                continue;
            }

            let len = state.transactions.len();
            let cut = match find_by_seq(max_seq, &state.transactions) {
                Some(pos) if pos < len => pos + 1,
                _ => len,
            };

            // The account had a transaction applied, so its age resets;
            // the survivors move into the age-0 bucket.
            self.metrics.pending_by_age(state.age).sub(len as i64);
            state.age = 0;
            self.metrics.pending_by_age(0).add((len - cut) as i64);

            self.drop_transactions(&account_key, 0..cut);
        }
    }

    /// Bans the given transactions, plus every queued transaction that
    /// can no longer apply because of them.
    ///
    /// Every input hash goes into the current ban set whether or not the
    /// transaction is queued. Within each source account, the
    /// lowest-sequence input that matches the queue by hash marks a cut:
    /// it and everything after it in the account's run is banned and
    /// dropped, because the later sequence numbers have lost their
    /// predecessor.
    pub fn ban(&mut self, txs: &[TransactionFramePtr]) {
        let mut txs_by_account: HashMap<AccountKey, Vec<TransactionFramePtr>> = HashMap::new();
        for tx in txs {
            txs_by_account
                .entry(account_key_from_account_id(&tx.source_id()))
                .or_default()
                .push(tx.clone());
            if let Some(front) = self.banned_transactions.front_mut() {
                front.insert(tx.full_hash());
            }
        }

        for (account_key, banned) in txs_by_account {
            // Fee releases from a previous group can erase this
            // account's state; resolve it fresh by key.
            let Some(state) = self.account_states.get(&account_key) else {
                continue;
            };
            if state.transactions.is_empty() {
                continue;
            }

            // The inputs for one account are not sorted; track the
            // lowest matching position seen so far.
            let mut cut: Option<usize> = None;
            for tx in &banned {
                let lower = match cut {
                    None => true,
                    Some(pos) => tx.seq_num() < state.transactions[pos].seq_num(),
                };
                if !lower {
                    continue;
                }
                if let Some(pos) = find_by_seq(tx.seq_num(), &state.transactions) {
                    if pos < state.transactions.len()
                        && state.transactions[pos].full_hash() == tx.full_hash()
                    {
                        cut = Some(pos);
                    }
                }
            }
            let Some(cut) = cut else {
                continue;
            };

            let len = state.transactions.len();
            if let Some(front) = self.banned_transactions.front_mut() {
                for tx in &state.transactions[cut..] {
                    front.insert(tx.full_hash());
                }
            }
            self.metrics.pending_by_age(state.age).sub((len - cut) as i64);

            self.drop_transactions(&account_key, cut..len);
        }
    }

    /// Advances the queue by one ledger.
    ///
    /// Rotates the ban ring, ages every account with queued
    /// transactions, bans the queues of accounts that have waited
    /// `pending_depth` ledgers, and republishes the per-age gauges.
    pub fn shift(&mut self) {
        // The oldest ban set lapses; a fresh set takes the front.
        self.banned_transactions.pop_back();
        self.banned_transactions.push_front(HashSet::new());

        let mut sizes = vec![0i64; self.pending_depth as usize];

        let account_keys: Vec<AccountKey> = self.account_states.keys().cloned().collect();
        for account_key in account_keys {
            // A fee release for an earlier account may have erased this
            // one.
            let (age, tx_count) = {
                let Some(state) = self.account_states.get_mut(&account_key) else {
                    continue;
                };
                // An account holding no transactions is only a fee
                // source; its age stays 0.
                if !state.transactions.is_empty() {
                    state.age += 1;
                }
                (state.age, state.transactions.len())
            };

            if age == self.pending_depth {
                let stale = self
                    .account_states
                    .get(&account_key)
                    .map(|state| state.transactions.clone())
                    .unwrap_or_default();
                for tx in &stale {
                    // The state being aged out still holds its
                    // transactions here, so releasing fees can only
                    // erase other account states.
                    self.release_fee_maybe_erase(tx);
                    if let Some(front) = self.banned_transactions.front_mut() {
                        front.insert(tx.full_hash());
                    }
                }
                debug!(
                    banned = stale.len(),
                    "banning transactions pending for too many ledgers"
                );

                let erase = match self.account_states.get_mut(&account_key) {
                    Some(state) => {
                        self.queue_size_ops -= state.queue_size_ops;
                        state.queue_size_ops = 0;
                        state.transactions.clear();
                        if state.total_fees == 0 {
                            true
                        } else {
                            state.age = 0;
                            false
                        }
                    }
                    None => false,
                };
                if erase {
                    self.account_states.remove(&account_key);
                }
            } else {
                sizes[age as usize] += tx_count as i64;
            }
        }

        for (age, size) in sizes.iter().enumerate() {
            self.metrics.pending_by_age(age as u32).set(*size);
        }
    }

    /// Queue-facing summary of one account's standing; zeros when the
    /// queue does not know the account.
    pub fn account_tx_queue_info(&self, account_id: &AccountId) -> AccountTxQueueInfo {
        let key = account_key_from_account_id(account_id);
        match self.account_states.get(&key) {
            Some(state) => AccountTxQueueInfo {
                max_seq: state
                    .transactions
                    .last()
                    .map(|tx| tx.seq_num())
                    .unwrap_or(0),
                total_fees: state.total_fees,
                queue_size_ops: state.queue_size_ops,
                age: state.age,
            },
            None => AccountTxQueueInfo::default(),
        }
    }

    /// Number of hashes in the `index`-th ban set; 0 is the current
    /// ledger's set.
    pub fn count_banned(&self, index: usize) -> usize {
        self.banned_transactions
            .get(index)
            .map(|set| set.len())
            .unwrap_or(0)
    }

    /// Whether any ban set holds the hash.
    pub fn is_banned(&self, hash: &Hash256) -> bool {
        self.banned_transactions.iter().any(|set| set.contains(hash))
    }

    /// Assembles a candidate transaction set for the ledger after `lcl`.
    ///
    /// Per account, queued transactions are taken in order up to and
    /// including the one just below the next ledger's starting sequence
    /// number: an account's transactions within one ledger must either
    /// all stay below that boundary or all start at it, never straddle.
    /// Account visitation order is unspecified; consumers re-sort.
    pub fn to_tx_set(&self, lcl: &LastClosedLedger) -> TransactionSet {
        let next_ledger_seq = lcl.header.ledger_seq + 1;
        let starting_seq = starting_sequence_number(next_ledger_seq);

        let mut envelopes = Vec::new();
        for state in self.account_states.values() {
            for tx in &state.transactions {
                envelopes.push(tx.envelope().clone());
                if tx.seq_num() == starting_seq - 1 {
                    break;
                }
            }
        }

        TransactionSet::new(lcl.hash, envelopes)
    }

    /// Reacts to a protocol upgrade in the last closed ledger.
    ///
    /// Crossing the protocol 13 boundary clears every ban set and
    /// rewrites all queued envelopes into their post-upgrade form,
    /// returning the old/new handle pairs so external indexes can
    /// rebind. Sequence numbers, fees, operation counts, and account
    /// roles are unchanged by the rewrite, so all queue accounting
    /// stands.
    pub fn maybe_version_upgraded(&mut self) -> Result<Vec<ReplacedTransaction>> {
        let mut replaced = Vec::new();

        let lcl = self.ledger.last_closed_header();
        if needs_upgrade_to_version(
            FEE_BUMP_PROTOCOL_VERSION,
            self.ledger_version,
            lcl.header.ledger_version,
        ) {
            for banned in self.banned_transactions.iter_mut() {
                banned.clear();
            }

            for state in self.account_states.values_mut() {
                for slot in state.transactions.iter_mut() {
                    let old = slot.clone();
                    let envelope = convert_for_v13(old.envelope().clone());
                    let new = TransactionFrame::from_wire(self.network_id, envelope)?;
                    *slot = new.clone();
                    replaced.push(ReplacedTransaction { old, new });
                }
            }
            debug!(
                rewritten = replaced.len(),
                ledger_version = lcl.header.ledger_version,
                "rewrote queued transactions after protocol upgrade"
            );
        }
        self.ledger_version = lcl.header.ledger_version;

        Ok(replaced)
    }
}
