use crate::identity::PublicKey;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const ADDRESS_LEN: usize = 20;
const HEX_PREFIX: &str = "0x";

#[derive(Error, Debug)]
pub enum AddressError {
    #[error("Invalid address format: {0}")]
    InvalidFormat(String),

    #[error("Invalid address length: expected 20 bytes, got {0}")]
    InvalidLength(usize),

    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),
}

/// 20-byte account identifier, rendered as `0x<hex>`
///
/// Externally owned accounts take the last 20 bytes of the Keccak-256 hash of
/// their public key. Contracts take the last 20 bytes of the hash of their
/// deployer and the deployer's nonce at deployment time.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The all-zero address. Never owned by a keypair.
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Derive the address of an externally owned account
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let hash = Keccak256::digest(public_key.as_bytes());
        Self::from_hash_tail(&hash)
    }

    /// Derive the address of a contract deployed by `deployer` at `nonce`
    pub fn contract(deployer: &Address, nonce: u64) -> Self {
        let mut hasher = Keccak256::new();
        hasher.update(b"contract:");
        hasher.update(deployer.0);
        hasher.update(nonce.to_le_bytes());
        Self::from_hash_tail(&hasher.finalize())
    }

    fn from_hash_tail(hash: &[u8]) -> Self {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&hash[hash.len() - ADDRESS_LEN..]);
        Self(bytes)
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }

    /// Parse a `0x`-prefixed hex address
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let digits = s
            .strip_prefix(HEX_PREFIX)
            .ok_or_else(|| AddressError::InvalidFormat(format!("missing '{}' prefix", HEX_PREFIX)))?;

        let bytes = hex::decode(digits).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        if bytes.len() != ADDRESS_LEN {
            return Err(AddressError::InvalidLength(bytes.len()));
        }

        let mut arr = [0u8; ADDRESS_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", HEX_PREFIX, hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
