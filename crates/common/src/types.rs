//! Core value types.
//!
//! The central type here is [`Hash256`], a 32-byte SHA-256 value used to
//! identify transactions, ledgers, and networks throughout the workspace.

use sha2::{Digest, Sha256};
use stellar_xdr::curr::{Limits, WriteXdr};

/// A 32-byte hash value.
///
/// Used for transaction hashes, ledger hashes, bucket hashes, and network
/// identifiers. The inner bytes are public to allow cheap conversion to
/// and from the XDR `Hash` type.
///
/// # Example
///
/// ```rust
/// use hayashi_common::Hash256;
///
/// let hash = Hash256::hash(b"hello world");
/// assert_eq!(hash.as_bytes().len(), 32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// The all-zero hash.
    pub const ZERO: Hash256 = Hash256([0u8; 32]);

    /// Computes the SHA-256 hash of the given data.
    pub fn hash(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Hash256(bytes)
    }

    /// Computes the SHA-256 hash of an XDR-encoded value.
    ///
    /// Serializes the value to XDR and hashes the resulting bytes.
    pub fn hash_xdr<T: WriteXdr>(value: &T) -> Result<Self, stellar_xdr::curr::Error> {
        let bytes = value.to_xdr(Limits::none())?;
        Ok(Self::hash(&bytes))
    }

    /// Returns a reference to the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns `true` if all bytes are zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Renders the hash as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses a hash from a 64-character hex string.
    pub fn from_hex(s: &str) -> crate::Result<Self> {
        let raw = hex::decode(s)
            .map_err(|e| crate::Error::InvalidData(format!("invalid hex hash: {e}")))?;
        let bytes: [u8; 32] = raw
            .try_into()
            .map_err(|_| crate::Error::InvalidData("hash must be 32 bytes".to_string()))?;
        Ok(Hash256(bytes))
    }
}

impl From<[u8; 32]> for Hash256 {
    fn from(bytes: [u8; 32]) -> Self {
        Hash256(bytes)
    }
}

impl From<Hash256> for stellar_xdr::curr::Hash {
    fn from(hash: Hash256) -> Self {
        stellar_xdr::curr::Hash(hash.0)
    }
}

impl From<stellar_xdr::curr::Hash> for Hash256 {
    fn from(hash: stellar_xdr::curr::Hash) -> Self {
        Hash256(hash.0)
    }
}

impl std::fmt::Display for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}
