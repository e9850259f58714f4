// Fungible-token ledger - balances, allowances and supply of the payment token

use crate::identity::Address;
use crate::ledger::access::{AccessError, MintCapability, Role, RoleRegistry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

const LEDGER_NAME: &str = "fungible-ledger";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FungibleError {
    #[error("Insufficient balance: available {available}, required {required}")]
    InsufficientBalance { available: u128, required: u128 },

    #[error("Insufficient allowance: approved {approved}, required {required}")]
    InsufficientAllowance { approved: u128, required: u128 },

    #[error("Access denied: {0}")]
    Access(#[from] AccessError),

    #[error("Token arithmetic would overflow")]
    Overflow,

    #[error("Zero address is not a valid counterparty")]
    ZeroAddress,
}

/// Events emitted by the fungible ledger.
/// Mints are transfers from the zero address, burns are transfers to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FungibleEvent {
    Transfer {
        from: Address,
        to: Address,
        amount: u128,
    },
    Approval {
        owner: Address,
        spender: Address,
        amount: u128,
    },
}

/// The fungible-token ledger
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FungibleLedger {
    address: Address,
    name: String,
    symbol: String,
    balances: HashMap<Address, u128>,
    /// owner -> spender -> remaining allowance
    allowances: HashMap<Address, HashMap<Address, u128>>,
    total_supply: u128,
    roles: RoleRegistry,
}

impl FungibleLedger {
    /// Deploy an empty ledger; `admin` receives the Admin role
    pub fn new(address: Address, admin: Address, name: &str, symbol: &str) -> Self {
        Self {
            address,
            name: name.to_string(),
            symbol: symbol.to_string(),
            balances: HashMap::new(),
            allowances: HashMap::new(),
            total_supply: 0,
            roles: RoleRegistry::with_admin(admin),
        }
    }

    /// Contract address of the ledger
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Human-readable token name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ticker symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Units minted and not yet burned
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Balance of `account`, zero if it never held tokens
    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Remaining amount `spender` may move or burn on behalf of `owner`
    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(owner)
            .and_then(|m| m.get(spender))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of all balances; equals total_supply while the ledger is consistent
    pub fn sum_of_balances(&self) -> u128 {
        self.balances.values().fold(0u128, |acc, b| acc.saturating_add(*b))
    }

    // ========================================================================
    // ROLES
    // ========================================================================

    /// Whether `account` holds `role` on this ledger
    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        self.roles.has_role(role, account)
    }

    /// Grant `role` to `account`; `caller` must be an admin
    pub fn grant_role(
        &mut self,
        caller: &Address,
        role: Role,
        account: Address,
    ) -> Result<bool, FungibleError> {
        Ok(self.roles.grant(LEDGER_NAME, caller, role, account)?)
    }

    /// Revoke `role` from `account`; `caller` must be an admin
    pub fn revoke_role(
        &mut self,
        caller: &Address,
        role: Role,
        account: &Address,
    ) -> Result<bool, FungibleError> {
        Ok(self.roles.revoke(LEDGER_NAME, caller, role, account)?)
    }

    // ========================================================================
    // TRANSFERS
    // ========================================================================

    /// Set the allowance of `spender` over `owner`'s balance (overwrites)
    pub fn approve(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: u128,
    ) -> Result<FungibleEvent, FungibleError> {
        if spender.is_zero() {
            return Err(FungibleError::ZeroAddress);
        }
        self.allowances
            .entry(*owner)
            .or_default()
            .insert(*spender, amount);

        Ok(FungibleEvent::Approval {
            owner: *owner,
            spender: *spender,
            amount,
        })
    }

    /// Move `amount` from `from` to `to`
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<FungibleEvent, FungibleError> {
        if to.is_zero() {
            return Err(FungibleError::ZeroAddress);
        }
        self.debit(from, amount)?;
        self.credit(to, amount)?;

        Ok(FungibleEvent::Transfer {
            from: *from,
            to: *to,
            amount,
        })
    }

    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming allowance
    pub fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<FungibleEvent, FungibleError> {
        if to.is_zero() {
            return Err(FungibleError::ZeroAddress);
        }
        self.check_allowance(from, spender, amount)?;
        self.check_balance(from, amount)?;

        self.spend_allowance(from, spender, amount);
        self.transfer(from, to, amount)
    }

    // ========================================================================
    // SUPPLY
    // ========================================================================

    /// Create `amount` new units for `to`. `minter` must hold the Minter role.
    pub fn mint(
        &mut self,
        minter: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<FungibleEvent, FungibleError> {
        self.roles.require(LEDGER_NAME, Role::Minter, minter)?;
        if to.is_zero() {
            return Err(FungibleError::ZeroAddress);
        }

        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(FungibleError::Overflow)?;
        self.credit(to, amount)?;
        self.total_supply = supply;

        Ok(FungibleEvent::Transfer {
            from: Address::ZERO,
            to: *to,
            amount,
        })
    }

    /// Destroy `amount` of `holder`'s own balance
    pub fn burn(&mut self, holder: &Address, amount: u128) -> Result<FungibleEvent, FungibleError> {
        self.debit(holder, amount)?;
        // debit succeeded, so amount <= some balance <= total_supply
        self.total_supply -= amount;

        Ok(FungibleEvent::Transfer {
            from: *holder,
            to: Address::ZERO,
            amount,
        })
    }

    /// Destroy `amount` of `holder`'s balance on behalf of `spender`, consuming allowance
    pub fn burn_from(
        &mut self,
        spender: &Address,
        holder: &Address,
        amount: u128,
    ) -> Result<FungibleEvent, FungibleError> {
        self.check_allowance(holder, spender, amount)?;
        self.check_balance(holder, amount)?;

        self.spend_allowance(holder, spender, amount);
        self.burn(holder, amount)
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    fn check_balance(&self, account: &Address, amount: u128) -> Result<(), FungibleError> {
        let available = self.balance_of(account);
        if available < amount {
            return Err(FungibleError::InsufficientBalance {
                available,
                required: amount,
            });
        }
        Ok(())
    }

    fn check_allowance(
        &self,
        owner: &Address,
        spender: &Address,
        amount: u128,
    ) -> Result<(), FungibleError> {
        let approved = self.allowance(owner, spender);
        if approved < amount {
            return Err(FungibleError::InsufficientAllowance {
                approved,
                required: amount,
            });
        }
        Ok(())
    }

    fn spend_allowance(&mut self, owner: &Address, spender: &Address, amount: u128) {
        if let Some(remaining) = self
            .allowances
            .get_mut(owner)
            .and_then(|m| m.get_mut(spender))
        {
            *remaining = remaining.saturating_sub(amount);
        }
    }

    fn debit(&mut self, account: &Address, amount: u128) -> Result<(), FungibleError> {
        self.check_balance(account, amount)?;
        let balance = self.balances.entry(*account).or_insert(0);
        *balance -= amount;
        Ok(())
    }

    fn credit(&mut self, account: &Address, amount: u128) -> Result<(), FungibleError> {
        let balance = self.balances.entry(*account).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(FungibleError::Overflow)?;
        Ok(())
    }
}

impl MintCapability for FungibleLedger {
    fn ledger_name(&self) -> &'static str {
        LEDGER_NAME
    }

    fn has_minter(&self, account: &Address) -> bool {
        self.roles.has_role(Role::Minter, account)
    }
}
