//! Transaction frame - wrapper around a wire transaction envelope.
//!
//! A [`TransactionFrame`] is built once from a network id and an
//! envelope, precomputes the hashes that identify the transaction, and
//! carries a mutable result slot so validation can record a user-visible
//! rejection reason. Frames are shared by [`TransactionFramePtr`] handle;
//! cloning the handle is cheap and preserves identity.

use std::sync::Arc;

use parking_lot::Mutex;

use hayashi_common::{Hash256, NetworkId};
use stellar_xdr::curr::{
    AccountId, EnvelopeType, Hash, MuxedAccount, Preconditions, PublicKey, Transaction,
    TransactionEnvelope, TransactionExt, TransactionResult, TransactionResultExt,
    TransactionResultResult, TransactionSignaturePayload,
    TransactionSignaturePayloadTaggedTransaction, TransactionV0, VecM,
};

use crate::Result;

/// Shared handle to a transaction frame.
///
/// The queue, broadcast indexes, and consensus hold the same frame
/// through this handle, so result codes set by one consumer are visible
/// to the others.
pub type TransactionFramePtr = Arc<TransactionFrame>;

/// A transaction envelope in its exploded form.
///
/// Exposes the envelope properties the node inspects without matching on
/// the envelope variants at every call site. For fee-bump envelopes the
/// *source* (the sequence-number owner) is the inner transaction's source
/// account, while the *fee source* is the outer wrapping account.
#[derive(Debug)]
pub struct TransactionFrame {
    /// The underlying transaction envelope.
    envelope: TransactionEnvelope,
    /// SHA-256 of the XDR-encoded envelope, signatures included.
    full_hash: Hash256,
    /// For fee-bump envelopes, the full hash of the wrapped inner
    /// envelope in its stand-alone form.
    inner_full_hash: Option<Hash256>,
    /// SHA-256 of the signature payload; binds the transaction to one
    /// network.
    contents_hash: Hash256,
    /// Result of the most recent validation or application attempt.
    result: Mutex<TransactionResult>,
}

impl TransactionFrame {
    /// Builds a frame from a network id and a wire envelope.
    ///
    /// Hashes are computed eagerly so later queries are infallible.
    pub fn from_wire(
        network_id: NetworkId,
        envelope: TransactionEnvelope,
    ) -> Result<TransactionFramePtr> {
        let full_hash = Hash256::hash_xdr(&envelope)?;

        let inner_full_hash = match &envelope {
            TransactionEnvelope::TxFeeBump(env) => {
                let stellar_xdr::curr::FeeBumpTransactionInnerTx::Tx(inner) = &env.tx.inner_tx;
                Some(Hash256::hash_xdr(&TransactionEnvelope::Tx(inner.clone()))?)
            }
            _ => None,
        };

        let payload = signature_payload(network_id, &envelope);
        let contents_hash = Hash256::hash_xdr(&payload)?;

        Ok(Arc::new(Self {
            envelope,
            full_hash,
            inner_full_hash,
            contents_hash,
            result: Mutex::new(success_result()),
        }))
    }

    /// Returns the underlying envelope.
    pub fn envelope(&self) -> &TransactionEnvelope {
        &self.envelope
    }

    /// Hash of the complete envelope, signatures included.
    pub fn full_hash(&self) -> Hash256 {
        self.full_hash
    }

    /// For fee-bump envelopes, the full hash of the wrapped inner
    /// envelope; `None` otherwise.
    pub fn inner_full_hash(&self) -> Option<Hash256> {
        self.inner_full_hash
    }

    /// Hash of the network-bound signature payload.
    pub fn contents_hash(&self) -> Hash256 {
        self.contents_hash
    }

    /// The envelope discriminant.
    pub fn envelope_type(&self) -> EnvelopeType {
        match &self.envelope {
            TransactionEnvelope::TxV0(_) => EnvelopeType::TxV0,
            TransactionEnvelope::Tx(_) => EnvelopeType::Tx,
            TransactionEnvelope::TxFeeBump(_) => EnvelopeType::TxFeeBump,
        }
    }

    /// Returns `true` for fee-bump envelopes.
    pub fn is_fee_bump(&self) -> bool {
        matches!(self.envelope, TransactionEnvelope::TxFeeBump(_))
    }

    /// The sequence-number-owning source account.
    pub fn source_id(&self) -> AccountId {
        let source = match &self.envelope {
            TransactionEnvelope::TxV0(env) => {
                MuxedAccount::Ed25519(env.tx.source_account_ed25519.clone())
            }
            TransactionEnvelope::Tx(env) => env.tx.source_account.clone(),
            TransactionEnvelope::TxFeeBump(env) => {
                let stellar_xdr::curr::FeeBumpTransactionInnerTx::Tx(inner) = &env.tx.inner_tx;
                inner.tx.source_account.clone()
            }
        };
        muxed_to_account_id(&source)
    }

    /// The account charged for the fee.
    ///
    /// The outer wrapping account for fee-bump envelopes, the source
    /// account otherwise.
    pub fn fee_source_id(&self) -> AccountId {
        let fee_source = match &self.envelope {
            TransactionEnvelope::TxV0(env) => {
                MuxedAccount::Ed25519(env.tx.source_account_ed25519.clone())
            }
            TransactionEnvelope::Tx(env) => env.tx.source_account.clone(),
            TransactionEnvelope::TxFeeBump(env) => env.tx.fee_source.clone(),
        };
        muxed_to_account_id(&fee_source)
    }

    /// The transaction's sequence number (the inner transaction's for
    /// fee-bump envelopes).
    pub fn seq_num(&self) -> i64 {
        match &self.envelope {
            TransactionEnvelope::TxV0(env) => env.tx.seq_num.0,
            TransactionEnvelope::Tx(env) => env.tx.seq_num.0,
            TransactionEnvelope::TxFeeBump(env) => {
                let stellar_xdr::curr::FeeBumpTransactionInnerTx::Tx(inner) = &env.tx.inner_tx;
                inner.tx.seq_num.0
            }
        }
    }

    /// Number of operations carried by the transaction.
    pub fn num_operations(&self) -> u32 {
        match &self.envelope {
            TransactionEnvelope::TxV0(env) => env.tx.operations.len() as u32,
            TransactionEnvelope::Tx(env) => env.tx.operations.len() as u32,
            TransactionEnvelope::TxFeeBump(env) => {
                let stellar_xdr::curr::FeeBumpTransactionInnerTx::Tx(inner) = &env.tx.inner_tx;
                inner.tx.operations.len() as u32
            }
        }
    }

    /// The declared fee bid.
    pub fn fee_bid(&self) -> i64 {
        match &self.envelope {
            TransactionEnvelope::TxV0(env) => env.tx.fee as i64,
            TransactionEnvelope::Tx(env) => env.tx.fee as i64,
            TransactionEnvelope::TxFeeBump(env) => env.tx.fee,
        }
    }

    /// A copy of the current result.
    pub fn result(&self) -> TransactionResult {
        self.result.lock().clone()
    }

    /// The current result code.
    pub fn result_code(&self) -> TransactionResultResult {
        self.result.lock().result.clone()
    }

    /// Records a user-visible result code.
    pub fn set_result_code(&self, code: TransactionResultResult) {
        self.result.lock().result = code;
    }

    /// Resets the result slot to success.
    pub(crate) fn reset_result(&self) {
        *self.result.lock() = success_result();
    }
}

fn success_result() -> TransactionResult {
    TransactionResult {
        fee_charged: 0,
        result: TransactionResultResult::TxSuccess(VecM::default()),
        ext: TransactionResultExt::V0,
    }
}

/// Builds the network-bound signature payload for an envelope.
///
/// Legacy V0 envelopes sign the V1 form of their transaction.
fn signature_payload(
    network_id: NetworkId,
    envelope: &TransactionEnvelope,
) -> TransactionSignaturePayload {
    let tagged_transaction = match envelope {
        TransactionEnvelope::TxV0(env) => {
            TransactionSignaturePayloadTaggedTransaction::Tx(v0_to_v1_transaction(&env.tx))
        }
        TransactionEnvelope::Tx(env) => {
            TransactionSignaturePayloadTaggedTransaction::Tx(env.tx.clone())
        }
        TransactionEnvelope::TxFeeBump(env) => {
            TransactionSignaturePayloadTaggedTransaction::TxFeeBump(env.tx.clone())
        }
    };

    TransactionSignaturePayload {
        network_id: Hash(network_id.0 .0),
        tagged_transaction,
    }
}

/// Converts a legacy V0 transaction to its V1 form.
///
/// V0 stores a raw ed25519 key and optional time bounds; V1 uses a muxed
/// account and preconditions.
pub(crate) fn v0_to_v1_transaction(v0: &TransactionV0) -> Transaction {
    Transaction {
        source_account: MuxedAccount::Ed25519(v0.source_account_ed25519.clone()),
        fee: v0.fee,
        seq_num: v0.seq_num.clone(),
        cond: match &v0.time_bounds {
            Some(tb) => Preconditions::Time(tb.clone()),
            None => Preconditions::None,
        },
        memo: v0.memo.clone(),
        operations: v0.operations.clone(),
        ext: TransactionExt::V0,
    }
}

/// Strips the multiplexing id from a muxed account, yielding the
/// underlying account id.
pub fn muxed_to_account_id(muxed: &MuxedAccount) -> AccountId {
    match muxed {
        MuxedAccount::Ed25519(key) => AccountId(PublicKey::PublicKeyTypeEd25519(key.clone())),
        MuxedAccount::MuxedEd25519(m) => {
            AccountId(PublicKey::PublicKeyTypeEd25519(m.ed25519.clone()))
        }
    }
}
