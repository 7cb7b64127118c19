//! Envelope normalization across the protocol 13 boundary.
//!
//! Protocol 13 introduced fee-bump transactions and retired the legacy
//! V0 envelope encoding. Envelopes received before the upgrade may still
//! be held in memory (for example in the pending transaction queue) when
//! the boundary is crossed; [`convert_for_v13`] rewrites them into the V1
//! form so the node only ever applies post-upgrade encodings.

use stellar_xdr::curr::{TransactionEnvelope, TransactionV1Envelope};

use crate::frame::v0_to_v1_transaction;

/// Rewrites a legacy V0 envelope into its V1 form.
///
/// The source key becomes a muxed account and optional time bounds
/// become preconditions; signatures carry over unchanged. V1 and
/// fee-bump envelopes are returned as-is.
pub fn convert_for_v13(envelope: TransactionEnvelope) -> TransactionEnvelope {
    match envelope {
        TransactionEnvelope::TxV0(env) => TransactionEnvelope::Tx(TransactionV1Envelope {
            tx: v0_to_v1_transaction(&env.tx),
            signatures: env.signatures,
        }),
        other => other,
    }
}
