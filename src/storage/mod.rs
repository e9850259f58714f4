// Storage module - sled persistence for the chain and operator keys

mod store;

pub use store::{ChainStore, StorageStats, StoreError};
