//! Protocol version utilities.
//!
//! The network coordinates upgrades through validator voting; each ledger
//! header carries the protocol version it was closed under. Use the
//! helpers in this module to gate behavior on the current version and to
//! detect when a close crossed an upgrade boundary.
//!
//! # Example
//!
//! ```rust
//! use hayashi_common::protocol::{
//!     needs_upgrade_to_version, protocol_version_starts_from, ProtocolVersion,
//! };
//!
//! assert!(protocol_version_starts_from(14, ProtocolVersion::V13));
//! assert!(needs_upgrade_to_version(ProtocolVersion::V13, 12, 13));
//! ```

/// Protocol version enumeration for type-safe version comparisons.
///
/// The enum uses `#[repr(u32)]` so the discriminant values match the
/// version numbers carried in ledger headers.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProtocolVersion {
    V0 = 0,
    V1 = 1,
    V2 = 2,
    V3 = 3,
    V4 = 4,
    V5 = 5,
    V6 = 6,
    V7 = 7,
    V8 = 8,
    V9 = 9,
    V10 = 10,
    V11 = 11,
    V12 = 12,
    V13 = 13,
    V14 = 14,
    V15 = 15,
    V16 = 16,
    V17 = 17,
    V18 = 18,
    V19 = 19,
    V20 = 20,
    V21 = 21,
    V22 = 22,
    V23 = 23,
    V24 = 24,
    V25 = 25,
}

impl ProtocolVersion {
    /// Convert to the underlying `u32` value.
    pub const fn as_u32(self) -> u32 {
        self as u32
    }
}

/// The protocol version that introduced fee-bump transaction envelopes
/// and retired the legacy V0 envelope encoding.
///
/// Crossing this boundary requires normalizing any V0 envelopes still
/// held in memory (e.g. the pending transaction queue) to the V1 form.
pub const FEE_BUMP_PROTOCOL_VERSION: ProtocolVersion = ProtocolVersion::V13;

/// The protocol version from which account liabilities are tracked and
/// subtracted from the balance available for fees.
pub const LIABILITIES_PROTOCOL_VERSION: ProtocolVersion = ProtocolVersion::V10;

/// Returns `true` if `version` is strictly before the target version.
#[inline]
pub fn protocol_version_is_before(version: u32, before: ProtocolVersion) -> bool {
    version < before.as_u32()
}

/// Returns `true` if `version` is at or after the target version.
///
/// This is the most commonly used version check for feature gating.
#[inline]
pub fn protocol_version_starts_from(version: u32, from: ProtocolVersion) -> bool {
    version >= from.as_u32()
}

/// Returns `true` if an upgrade to the target version occurred between
/// `prev_version` and `new_version`.
///
/// Useful for detecting that a ledger close just crossed an upgrade
/// boundary and migration logic needs to run.
#[inline]
pub fn needs_upgrade_to_version(
    target: ProtocolVersion,
    prev_version: u32,
    new_version: u32,
) -> bool {
    protocol_version_is_before(prev_version, target)
        && protocol_version_starts_from(new_version, target)
}
