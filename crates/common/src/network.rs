//! Network identity types.
//!
//! Each network is identified by a unique passphrase; the network ID is
//! the SHA-256 hash of that passphrase. Transaction hashes incorporate
//! the network ID, so a transaction signed for one network cannot be
//! replayed on another.
//!
//! # Example
//!
//! ```rust
//! use hayashi_common::NetworkId;
//!
//! let testnet = NetworkId::testnet();
//! let mainnet = NetworkId::mainnet();
//! assert_ne!(testnet, mainnet);
//! ```

use crate::types::Hash256;

/// A unique identifier for a network, derived from its passphrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkId(pub Hash256);

impl NetworkId {
    /// Creates a network ID from a passphrase string.
    ///
    /// The network ID is computed as `SHA256(passphrase)`.
    pub fn from_passphrase(passphrase: &str) -> Self {
        Self(Hash256::hash(passphrase.as_bytes()))
    }

    /// Returns a reference to the underlying 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    /// Returns the network ID for the public testnet.
    pub fn testnet() -> Self {
        Self::from_passphrase("Test SDF Network ; September 2015")
    }

    /// Returns the network ID for the public mainnet.
    pub fn mainnet() -> Self {
        Self::from_passphrase("Public Global Stellar Network ; September 2015")
    }
}

impl From<NetworkId> for stellar_xdr::curr::Hash {
    fn from(id: NetworkId) -> Self {
        stellar_xdr::curr::Hash(id.0 .0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_ids_differ() {
        assert_ne!(NetworkId::testnet(), NetworkId::mainnet());
        assert!(!NetworkId::testnet().0.is_zero());
    }

    #[test]
    fn test_from_passphrase_is_deterministic() {
        let a = NetworkId::from_passphrase("Custom Network ; 2024");
        let b = NetworkId::from_passphrase("Custom Network ; 2024");
        assert_eq!(a, b);
    }
}
