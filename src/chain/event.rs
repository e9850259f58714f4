use crate::chain::NativeTransfer;
use crate::identity::Address;
use crate::ledger::{CollectibleEvent, FungibleEvent, Role};
use crate::shop::ShopEvent;
use serde::{Deserialize, Serialize};

/// Which external ledger a call or event refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerKind {
    Token,
    Collectible,
}

/// Everything a committed transaction can emit, in emission order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Native(NativeTransfer),
    Token(FungibleEvent),
    Collectible(CollectibleEvent),
    RoleChanged {
        ledger: LedgerKind,
        role: Role,
        account: Address,
        granted: bool,
    },
    Shop(ShopEvent),
}

impl From<NativeTransfer> for Event {
    fn from(transfer: NativeTransfer) -> Self {
        Event::Native(transfer)
    }
}

impl From<FungibleEvent> for Event {
    fn from(event: FungibleEvent) -> Self {
        Event::Token(event)
    }
}

impl From<CollectibleEvent> for Event {
    fn from(event: CollectibleEvent) -> Self {
        Event::Collectible(event)
    }
}

impl From<ShopEvent> for Event {
    fn from(event: ShopEvent) -> Self {
        Event::Shop(event)
    }
}
