// ChainStore - persistent key-value storage using sled
//
// Holds:
// - the serialized chain (world state, nonces, receipts)
// - labelled account keypairs used by the CLI

use crate::chain::{Chain, CodecError};
use crate::identity::Keypair;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Key prefixes for organizing data
mod keys {
    pub const CHAIN_STATE: &[u8] = b"chain:state";
    pub const KEYPAIR_PREFIX: &[u8] = b"account:keypair:";
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open database: {0}")]
    OpenFailed(String),

    #[error("Database operation failed: {0}")]
    DatabaseError(String),

    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Flush failed: {0}")]
    FlushFailed(String),
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::DatabaseError(err.to_string())
    }
}

/// Statistics about the storage
#[derive(Clone, Debug)]
pub struct StorageStats {
    /// Number of keys in the database
    pub key_count: usize,
    /// Approximate disk size in bytes
    pub disk_size_bytes: u64,
}

/// Persistent store for a chain and its operator keypairs
///
/// Writes are atomic per key and durable after flush.
pub struct ChainStore {
    db: sled::Db,
}

impl ChainStore {
    /// Open or create a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(|e| StoreError::OpenFailed(e.to_string()))?;
        Ok(Self { db })
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::FlushFailed(e.to_string()))?;
        Ok(())
    }

    pub fn stats(&self) -> StorageStats {
        StorageStats {
            key_count: self.db.len(),
            disk_size_bytes: self.db.size_on_disk().unwrap_or(0),
        }
    }

    fn put_raw(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.db.insert(key, value)?;
        Ok(())
    }

    fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.db.get(key)?.map(|v| v.to_vec()))
    }

    // ========================================================================
    // CHAIN PERSISTENCE
    // ========================================================================

    pub fn has_chain(&self) -> Result<bool, StoreError> {
        Ok(self.db.contains_key(keys::CHAIN_STATE)?)
    }

    /// Save the chain and flush it to disk
    pub fn save_chain(&self, chain: &Chain) -> Result<(), StoreError> {
        let bytes = chain
            .to_bytes()
            .map_err(|e: CodecError| StoreError::SerializationFailed(e.to_string()))?;
        self.put_raw(keys::CHAIN_STATE, &bytes)?;
        self.flush()?;
        debug!(bytes = bytes.len(), height = chain.height(), "chain saved");
        Ok(())
    }

    pub fn load_chain(&self) -> Result<Option<Chain>, StoreError> {
        match self.get_raw(keys::CHAIN_STATE)? {
            Some(bytes) => {
                let chain = Chain::from_bytes(&bytes)
                    .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?;
                Ok(Some(chain))
            }
            None => Ok(None),
        }
    }

    // ========================================================================
    // KEYPAIR PERSISTENCE
    // ========================================================================

    fn keypair_key(label: &str) -> Vec<u8> {
        [keys::KEYPAIR_PREFIX, label.as_bytes()].concat()
    }

    pub fn save_keypair(&self, label: &str, keypair: &Keypair) -> Result<(), StoreError> {
        self.put_raw(&Self::keypair_key(label), &keypair.to_bytes())
    }

    pub fn load_keypair(&self, label: &str) -> Result<Option<Keypair>, StoreError> {
        match self.get_raw(&Self::keypair_key(label))? {
            Some(bytes) => {
                let keypair = Keypair::from_bytes(&bytes)
                    .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?;
                Ok(Some(keypair))
            }
            None => Ok(None),
        }
    }

    /// Labels of all stored keypairs, in key order
    pub fn keypair_labels(&self) -> Result<Vec<String>, StoreError> {
        let mut labels = Vec::new();
        for result in self.db.scan_prefix(keys::KEYPAIR_PREFIX) {
            let (key, _) = result?;
            let label = String::from_utf8_lossy(&key[keys::KEYPAIR_PREFIX.len()..]).into_owned();
            labels.push(label);
        }
        Ok(labels)
    }
}
