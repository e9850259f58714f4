// Native bank - balances of the chain's native currency

use crate::identity::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NativeError {
    #[error("Insufficient native balance for {account}: available {available}, required {required}")]
    InsufficientBalance {
        account: Address,
        available: u128,
        required: u128,
    },

    #[error("Native balance would overflow")]
    Overflow,
}

/// A movement of native currency
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeTransfer {
    pub from: Address,
    pub to: Address,
    pub amount: u128,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NativeBank {
    balances: HashMap<Address, u128>,
    total_issued: u128,
}

impl NativeBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Native currency created through genesis allocations
    pub fn total_issued(&self) -> u128 {
        self.total_issued
    }

    /// Genesis allocation. Only the harness and the CLI faucet call this.
    pub fn issue(&mut self, to: &Address, amount: u128) -> Result<(), NativeError> {
        let total = self
            .total_issued
            .checked_add(amount)
            .ok_or(NativeError::Overflow)?;
        let balance = self.balance_of(to).checked_add(amount).ok_or(NativeError::Overflow)?;

        self.balances.insert(*to, balance);
        self.total_issued = total;
        Ok(())
    }

    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<NativeTransfer, NativeError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(NativeError::InsufficientBalance {
                account: *from,
                available,
                required: amount,
            });
        }

        self.balances.insert(*from, available - amount);
        let credited = self.balance_of(to).checked_add(amount).ok_or(NativeError::Overflow)?;
        self.balances.insert(*to, credited);

        Ok(NativeTransfer {
            from: *from,
            to: *to,
            amount,
        })
    }
}
