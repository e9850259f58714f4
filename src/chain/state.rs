// World state - everything a transaction can touch, snapshotted per call

use crate::chain::{CallContext, Event, NativeBank};
use crate::identity::Address;
use crate::ledger::{CollectibleLedger, FungibleLedger};
use crate::shop::{ShopError, TokenSale};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Consistency failures found by World::audit
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    #[error("Native reserve {reserve} does not equal deposits {deposits} minus payouts {payouts}")]
    NativeReserveMismatch {
        reserve: u128,
        deposits: u128,
        payouts: u128,
    },

    #[error("Pool balance {pool} exceeds the shop's token holdings {held}")]
    PoolUnbacked { pool: u128, held: u128 },

    #[error("Token supply {supply} does not equal the sum of balances {sum}")]
    TokenSupplyMismatch { supply: u128, sum: u128 },

    #[error("Collectible supply {supply} does not equal the sum of balances {sum}")]
    CollectibleSupplyMismatch { supply: u64, sum: u64 },
}

/// The native bank, both external ledgers and the shop
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct World {
    native: NativeBank,
    token: FungibleLedger,
    collectible: CollectibleLedger,
    sale: TokenSale,
}

impl World {
    pub fn new(
        native: NativeBank,
        token: FungibleLedger,
        collectible: CollectibleLedger,
        sale: TokenSale,
    ) -> Self {
        Self {
            native,
            token,
            collectible,
            sale,
        }
    }

    pub fn native(&self) -> &NativeBank {
        &self.native
    }

    pub fn token(&self) -> &FungibleLedger {
        &self.token
    }

    pub fn collectible(&self) -> &CollectibleLedger {
        &self.collectible
    }

    pub fn sale(&self) -> &TokenSale {
        &self.sale
    }

    /// The shop's native balance
    pub fn native_reserve(&self) -> u128 {
        self.native.balance_of(self.sale.address())
    }

    pub fn is_contract(&self, address: &Address) -> bool {
        address == self.token.address()
            || address == self.collectible.address()
            || address == self.sale.address()
    }

    pub(crate) fn native_mut(&mut self) -> &mut NativeBank {
        &mut self.native
    }

    /// Run `f` against the world as one atomic unit.
    ///
    /// On error the world is restored to its state before the call and the
    /// events emitted so far are dropped.
    pub fn transact<T, F>(
        &mut self,
        caller: Address,
        value: u128,
        f: F,
    ) -> Result<(T, Vec<Event>), ShopError>
    where
        F: FnOnce(&mut TokenSale, &mut CallContext<'_>) -> Result<T, ShopError>,
    {
        let snapshot = self.clone();
        let mut events = Vec::new();

        let result = {
            let World {
                native,
                token,
                collectible,
                sale,
            } = self;
            let mut ctx = CallContext::new(caller, value, native, token, collectible, &mut events);
            f(sale, &mut ctx)
        };

        match result {
            Ok(output) => Ok((output, events)),
            Err(err) => {
                *self = snapshot;
                Err(err)
            }
        }
    }

    /// Check the conservation invariants across the shop and both ledgers
    pub fn audit(&self) -> Result<(), AuditError> {
        let reserve = self.native_reserve();
        let deposits = self.sale.total_deposits();
        let payouts = self.sale.total_payouts();
        if reserve.checked_add(payouts) != Some(deposits) {
            return Err(AuditError::NativeReserveMismatch {
                reserve,
                deposits,
                payouts,
            });
        }

        let pool = self.sale.pool_balance();
        let held = self.token.balance_of(self.sale.address());
        if pool > held {
            return Err(AuditError::PoolUnbacked { pool, held });
        }

        let supply = self.token.total_supply();
        let sum = self.token.sum_of_balances();
        if supply != sum {
            return Err(AuditError::TokenSupplyMismatch { supply, sum });
        }

        let supply = self.collectible.total_supply();
        let sum = self.collectible.sum_of_balances();
        if supply != sum {
            return Err(AuditError::CollectibleSupplyMismatch { supply, sum });
        }

        Ok(())
    }
}
