//! tokenshop
//!
//! A fixed-ratio exchange between a chain's native currency and a fungible
//! token, plus a collectible pool priced in that token. The shop runs on a
//! single-writer chain where every transaction commits in full or reverts in
//! full.
//!
//! - [`shop`]: the exchange core (`TokenSale`) and its error taxonomy
//! - [`ledger`]: the fungible and collectible ledgers and the mint `AccessGate`
//! - [`chain`]: signed transactions, atomic execution, receipts, deployment
//! - [`identity`]: ed25519 keys, addresses and signatures
//! - [`storage`]: sled persistence for the chain and operator keys

pub mod chain;
pub mod identity;
pub mod ledger;
pub mod shop;
pub mod storage;
