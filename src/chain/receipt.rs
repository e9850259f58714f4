use crate::chain::{Event, TxId};
use crate::identity::Address;
use crate::ledger::TokenId;
use crate::shop::ErrorKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Value returned by a committed call
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Tokens minted by purchase_tokens
    Minted(u128),
    /// Native units paid by burn_tokens
    Payout(u128),
    /// Id minted by purchase_collectible
    Collectible(TokenId),
    /// Pool share paid by burn_collectible
    Share(u128),
    /// Tokens moved to the owner by withdraw
    Withdrawn(u128),
    /// Calls without a return value
    Done,
}

impl Outcome {
    /// The token or native amount carried by the outcome, if any
    pub fn amount(&self) -> Option<u128> {
        match self {
            Outcome::Minted(a) | Outcome::Payout(a) | Outcome::Share(a) | Outcome::Withdrawn(a) => {
                Some(*a)
            }
            Outcome::Collectible(_) | Outcome::Done => None,
        }
    }

    pub fn collectible_id(&self) -> Option<TokenId> {
        match self {
            Outcome::Collectible(id) => Some(*id),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    Committed(Outcome),
    /// Every state change of the call was discarded
    Reverted { kind: ErrorKind, reason: String },
}

/// Record of an executed transaction, committed or reverted
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Receipt {
    tx_id: TxId,
    sender: Address,
    nonce: u64,
    call: String,
    status: TxStatus,
    events: Vec<Event>,
    height: u64,
    executed_at: DateTime<Utc>,
}

impl Receipt {
    pub(crate) fn new(
        tx_id: TxId,
        sender: Address,
        nonce: u64,
        call: &str,
        status: TxStatus,
        events: Vec<Event>,
        height: u64,
    ) -> Self {
        Self {
            tx_id,
            sender,
            nonce,
            call: call.to_string(),
            status,
            events,
            height,
            executed_at: Utc::now(),
        }
    }

    pub fn tx_id(&self) -> &TxId {
        &self.tx_id
    }

    pub fn sender(&self) -> &Address {
        &self.sender
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Name of the invoked call
    pub fn call(&self) -> &str {
        &self.call
    }

    pub fn status(&self) -> &TxStatus {
        &self.status
    }

    /// Events in emission order; empty for reverted transactions
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Position of this transaction in the chain's history
    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn executed_at(&self) -> DateTime<Utc> {
        self.executed_at
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, TxStatus::Committed(_))
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.status {
            TxStatus::Committed(outcome) => Some(outcome),
            TxStatus::Reverted { .. } => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match &self.status {
            TxStatus::Reverted { kind, .. } => Some(*kind),
            TxStatus::Committed(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match &self.status {
            TxStatus::Reverted { reason, .. } => Some(reason),
            TxStatus::Committed(_) => None,
        }
    }
}
