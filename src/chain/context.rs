use crate::chain::{Event, NativeBank};
use crate::identity::Address;
use crate::ledger::{CollectibleLedger, FungibleLedger};

/// Mutable view of the world handed to contract code for one call.
///
/// Only World::transact builds one, so every mutation made through it is
/// covered by that transaction's snapshot.
pub struct CallContext<'a> {
    caller: Address,
    value: u128,
    pub(crate) native: &'a mut NativeBank,
    pub(crate) token: &'a mut FungibleLedger,
    pub(crate) collectible: &'a mut CollectibleLedger,
    events: &'a mut Vec<Event>,
}

impl<'a> CallContext<'a> {
    pub(crate) fn new(
        caller: Address,
        value: u128,
        native: &'a mut NativeBank,
        token: &'a mut FungibleLedger,
        collectible: &'a mut CollectibleLedger,
        events: &'a mut Vec<Event>,
    ) -> Self {
        Self {
            caller,
            value,
            native,
            token,
            collectible,
            events,
        }
    }

    /// The account that signed the transaction
    pub fn caller(&self) -> Address {
        self.caller
    }

    /// Native value attached to the call
    pub fn value(&self) -> u128 {
        self.value
    }

    pub fn native(&self) -> &NativeBank {
        &*self.native
    }

    pub fn token(&self) -> &FungibleLedger {
        &*self.token
    }

    pub fn collectible(&self) -> &CollectibleLedger {
        &*self.collectible
    }

    pub fn emit(&mut self, event: impl Into<Event>) {
        self.events.push(event.into());
    }
}
