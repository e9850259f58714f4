use crate::identity::Address;
use crate::ledger::TokenId;
use serde::{Deserialize, Serialize};

/// Events emitted by the shop itself
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopEvent {
    TokensPurchased {
        buyer: Address,
        deposit: u128,
        minted: u128,
    },
    TokensBurned {
        holder: Address,
        amount: u128,
        payout: u128,
    },
    CollectiblePurchased {
        buyer: Address,
        id: TokenId,
        price: u128,
    },
    CollectibleBurned {
        holder: Address,
        id: TokenId,
        share: u128,
    },
    Withdrawn {
        owner: Address,
        amount: u128,
    },
}
