// Error taxonomy for everything that runs inside a transaction

use crate::chain::NativeError;
use crate::identity::Address;
use crate::ledger::{AccessError, CollectibleError, FungibleError, TokenId};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Machine-readable failure class reported on reverted receipts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Caller lacks owner identity, a role, or an approval
    Authorization,
    /// Deposit mismatch, insolvent reserve, short balance or allowance
    InsufficientFunds,
    /// Bad configuration, bad amount, overdraw of the pool, arithmetic overflow
    InvariantViolation,
    /// Referenced collectible does not exist or is not the caller's
    NotFound,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Authorization => "authorization",
            ErrorKind::InsufficientFunds => "insufficient-funds",
            ErrorKind::InvariantViolation => "invariant-violation",
            ErrorKind::NotFound => "not-found",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShopError {
    // Authorization
    #[error("{caller} is not the shop owner")]
    Unauthorized { caller: Address },

    #[error("Access denied: {0}")]
    AccessDenied(#[from] AccessError),

    #[error("{operator} is not approved for collectible {id}")]
    NotApproved { id: TokenId, operator: Address },

    // Insufficient funds
    #[error("Attached value {attached} does not match declared deposit {declared}")]
    DepositMismatch { declared: u128, attached: u128 },

    #[error("Native reserve {reserve} cannot cover payout {payout}")]
    InsufficientReserve { reserve: u128, payout: u128 },

    #[error("Insufficient allowance: approved {approved}, required {required}")]
    InsufficientAllowance { approved: u128, required: u128 },

    #[error("Insufficient balance: available {available}, required {required}")]
    InsufficientBalance { available: u128, required: u128 },

    // Invariant violations
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Withdrawal of {requested} exceeds pool balance {available}")]
    ExceedsPool { requested: u128, available: u128 },

    #[error("No outstanding collectibles to share the pool between")]
    NoOutstandingCollectibles,

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Zero address is not a valid counterparty")]
    ZeroAddress,

    #[error("Call does not accept attached value")]
    NonPayable,

    #[error("Native transfers to contract {0} are not accepted")]
    ContractRecipient(Address),

    // Not found
    #[error("Collectible {0} does not exist")]
    CollectibleNotFound(TokenId),

    #[error("{account} does not own collectible {id}")]
    NotCollectibleOwner { id: TokenId, account: Address },
}

impl ShopError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShopError::Unauthorized { .. }
            | ShopError::AccessDenied(_)
            | ShopError::NotApproved { .. } => ErrorKind::Authorization,

            ShopError::DepositMismatch { .. }
            | ShopError::InsufficientReserve { .. }
            | ShopError::InsufficientAllowance { .. }
            | ShopError::InsufficientBalance { .. } => ErrorKind::InsufficientFunds,

            ShopError::InvalidConfig(_)
            | ShopError::InvalidAmount(_)
            | ShopError::ExceedsPool { .. }
            | ShopError::NoOutstandingCollectibles
            | ShopError::Overflow
            | ShopError::ZeroAddress
            | ShopError::NonPayable
            | ShopError::ContractRecipient(_) => ErrorKind::InvariantViolation,

            ShopError::CollectibleNotFound(_) | ShopError::NotCollectibleOwner { .. } => {
                ErrorKind::NotFound
            }
        }
    }
}

impl From<FungibleError> for ShopError {
    fn from(err: FungibleError) -> Self {
        match err {
            FungibleError::InsufficientBalance {
                available,
                required,
            } => ShopError::InsufficientBalance {
                available,
                required,
            },
            FungibleError::InsufficientAllowance { approved, required } => {
                ShopError::InsufficientAllowance { approved, required }
            }
            FungibleError::Access(e) => ShopError::AccessDenied(e),
            FungibleError::Overflow => ShopError::Overflow,
            FungibleError::ZeroAddress => ShopError::ZeroAddress,
        }
    }
}

impl From<CollectibleError> for ShopError {
    fn from(err: CollectibleError) -> Self {
        match err {
            CollectibleError::NotFound(id) => ShopError::CollectibleNotFound(id),
            CollectibleError::NotOwner { id, account } => {
                ShopError::NotCollectibleOwner { id, account }
            }
            CollectibleError::NotApproved { id, operator } => {
                ShopError::NotApproved { id, operator }
            }
            CollectibleError::Access(e) => ShopError::AccessDenied(e),
            CollectibleError::ZeroAddress => ShopError::ZeroAddress,
            CollectibleError::IdsExhausted => ShopError::Overflow,
        }
    }
}

impl From<NativeError> for ShopError {
    fn from(err: NativeError) -> Self {
        match err {
            NativeError::InsufficientBalance {
                available,
                required,
                ..
            } => ShopError::InsufficientBalance {
                available,
                required,
            },
            NativeError::Overflow => ShopError::Overflow,
        }
    }
}
