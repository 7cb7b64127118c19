//! Drives the pending transaction queue through full ledger cycles using
//! only its public surface: admission, candidate set assembly, post-close
//! reconciliation, aging, and ban expiry.

use std::sync::{Arc, Mutex};

use hayashi_common::{Hash256, NetworkId};
use hayashi_herder::{
    AccountTxQueueInfo, AddResult, LedgerStateProvider, TransactionQueue, TxQueueConfig,
};
use hayashi_ledger::{default_header, LastClosedLedger, LedgerSnapshot, SnapshotBuilder};
use hayashi_tx::{TransactionFrame, TransactionFramePtr};
use stellar_xdr::curr::{
    AccountEntry, AccountEntryExt, AccountId, CreateAccountOp, DecoratedSignature, Memo,
    MuxedAccount, Operation, OperationBody, Preconditions, PublicKey, SequenceNumber,
    Signature as XdrSignature, SignatureHint, String32, Thresholds, Transaction,
    TransactionEnvelope, TransactionExt, TransactionV1Envelope, Uint256, VecM,
};

const BALANCE: i64 = 1_000_000_000_000;

fn test_account(seed: u8) -> AccountId {
    AccountId(PublicKey::PublicKeyTypeEd25519(Uint256([seed; 32])))
}

struct HostLedgerInner {
    ledger_seq: u32,
    accounts: Vec<AccountEntry>,
}

/// Minimal in-memory stand-in for the node's ledger manager.
struct HostLedger {
    inner: Mutex<HostLedgerInner>,
}

impl HostLedger {
    fn new(ledger_seq: u32) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(HostLedgerInner {
                ledger_seq,
                accounts: Vec::new(),
            }),
        })
    }

    fn add_account(&self, seed: u8, seq: i64) {
        self.inner.lock().unwrap().accounts.push(AccountEntry {
            account_id: test_account(seed),
            balance: BALANCE,
            seq_num: SequenceNumber(seq),
            num_sub_entries: 0,
            inflation_dest: None,
            flags: 0,
            home_domain: String32::default(),
            thresholds: Thresholds([1, 0, 0, 0]),
            signers: VecM::default(),
            ext: AccountEntryExt::V0,
        });
    }

    /// Applies a ledger close: bumps the sequence number of every
    /// account that had a transaction applied and advances the ledger.
    fn close_ledger(&self, applied: &[TransactionFramePtr]) {
        let mut inner = self.inner.lock().unwrap();
        inner.ledger_seq += 1;
        for tx in applied {
            let source = tx.source_id();
            for account in inner.accounts.iter_mut() {
                if account.account_id == source && account.seq_num.0 < tx.seq_num() {
                    account.seq_num = SequenceNumber(tx.seq_num());
                }
            }
        }
    }
}

impl LedgerStateProvider for HostLedger {
    fn last_closed_header(&self) -> LastClosedLedger {
        let header = default_header(self.inner.lock().unwrap().ledger_seq);
        let hash = Hash256::hash_xdr(&header).unwrap_or_default();
        LastClosedLedger { hash, header }
    }

    fn last_max_tx_set_size_ops(&self) -> u32 {
        1000
    }

    fn open_read_snapshot(&self) -> LedgerSnapshot {
        let inner = self.inner.lock().unwrap();
        let mut builder = SnapshotBuilder::new(inner.ledger_seq)
            .with_header(default_header(inner.ledger_seq), Hash256::ZERO);
        for account in inner.accounts.iter() {
            builder = builder.add_account(account.clone());
        }
        builder.build_with_default_header()
    }
}

#[test]
fn queue_survives_full_ledger_cycles() {
    let ledger = HostLedger::new(10);
    ledger.add_account(1, 4);
    ledger.add_account(2, 2);

    let mut queue = TransactionQueue::new(TxQueueConfig::default(), ledger.clone());

    let a5 = tx_frame(1, 5, 100);
    let a6 = tx_frame(1, 6, 100);
    let b3 = tx_frame(2, 3, 100);
    assert_eq!(queue.try_add(a5.clone()), AddResult::Pending);
    assert_eq!(queue.try_add(a6.clone()), AddResult::Pending);
    assert_eq!(queue.try_add(b3.clone()), AddResult::Pending);

    // The candidate set for the next ledger carries all three.
    let set = queue.to_tx_set(&ledger.last_closed_header());
    assert_eq!(set.len(), 3);

    // Consensus applies A5 and B3; the host closes the ledger and runs
    // the per-close sequence.
    let applied = vec![a5.clone(), b3.clone()];
    ledger.close_ledger(&applied);
    assert!(queue.maybe_version_upgraded().unwrap().is_empty());
    queue.remove_applied(&applied);
    queue.shift();

    assert_eq!(
        queue.account_tx_queue_info(&test_account(1)),
        AccountTxQueueInfo {
            max_seq: 6,
            total_fees: 100,
            queue_size_ops: 1,
            age: 0,
        }
    );
    assert_eq!(
        queue.account_tx_queue_info(&test_account(2)),
        AccountTxQueueInfo::default()
    );

    // A6 never makes it into a ledger; after pending_depth closes it is
    // banned.
    for _ in 0..3 {
        ledger.close_ledger(&[]);
        assert!(queue.maybe_version_upgraded().unwrap().is_empty());
        queue.remove_applied(&[]);
        queue.shift();
    }
    assert!(queue.is_banned(&a6.full_hash()));
    assert_eq!(
        queue.account_tx_queue_info(&test_account(1)),
        AccountTxQueueInfo::default()
    );
    assert_eq!(queue.try_add(a6.clone()), AddResult::TryAgainLater);

    // The ban lapses after ban_depth further closes and the transaction
    // is admissible again.
    for _ in 0..10 {
        ledger.close_ledger(&[]);
        queue.remove_applied(&[]);
        queue.shift();
    }
    assert!(!queue.is_banned(&a6.full_hash()));
    assert_eq!(queue.try_add(a6), AddResult::Pending);

    let set = queue.to_tx_set(&ledger.last_closed_header());
    assert_eq!(set.len(), 1);
}

fn tx_frame(seed: u8, seq: i64, fee: u32) -> TransactionFramePtr {
    let op = Operation {
        source_account: None,
        body: OperationBody::CreateAccount(CreateAccountOp {
            destination: test_account(99),
            starting_balance: 1_000_000_000,
        }),
    };
    let envelope = TransactionEnvelope::Tx(TransactionV1Envelope {
        tx: Transaction {
            source_account: MuxedAccount::Ed25519(Uint256([seed; 32])),
            fee,
            seq_num: SequenceNumber(seq),
            cond: Preconditions::None,
            memo: Memo::None,
            operations: vec![op].try_into().unwrap(),
            ext: TransactionExt::V0,
        },
        signatures: vec![DecoratedSignature {
            hint: SignatureHint([0u8; 4]),
            signature: XdrSignature(vec![0u8; 64].try_into().unwrap()),
        }]
        .try_into()
        .unwrap(),
    });
    TransactionFrame::from_wire(NetworkId::testnet(), envelope).unwrap()
}
