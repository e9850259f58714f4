// Collectible ledger - unique items with single ownership per id

use crate::identity::Address;
use crate::ledger::access::{AccessError, MintCapability, Role, RoleRegistry};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

const LEDGER_NAME: &str = "collectible-ledger";

/// Collectible identifier. Allocated sequentially and never reused.
pub type TokenId = u64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectibleError {
    #[error("Collectible {0} does not exist")]
    NotFound(TokenId),

    #[error("{account} does not own collectible {id}")]
    NotOwner { id: TokenId, account: Address },

    #[error("{operator} is neither owner nor approved for collectible {id}")]
    NotApproved { id: TokenId, operator: Address },

    #[error("Access denied: {0}")]
    Access(#[from] AccessError),

    #[error("Zero address is not a valid counterparty")]
    ZeroAddress,

    #[error("Collectible id space exhausted")]
    IdsExhausted,
}

/// Events emitted by the collectible ledger.
/// Mints are transfers from the zero address, burns are transfers to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleEvent {
    Transfer {
        from: Address,
        to: Address,
        id: TokenId,
    },
    Approval {
        owner: Address,
        approved: Address,
        id: TokenId,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CollectibleLedger {
    address: Address,
    name: String,
    symbol: String,
    owners: BTreeMap<TokenId, Address>,
    balances: HashMap<Address, u64>,
    approvals: HashMap<TokenId, Address>,
    next_id: TokenId,
    roles: RoleRegistry,
}

impl CollectibleLedger {
    /// Deploy an empty ledger; `admin` receives the Admin role
    pub fn new(address: Address, admin: Address, name: &str, symbol: &str) -> Self {
        Self {
            address,
            name: name.to_string(),
            symbol: symbol.to_string(),
            owners: BTreeMap::new(),
            balances: HashMap::new(),
            approvals: HashMap::new(),
            next_id: 0,
            roles: RoleRegistry::with_admin(admin),
        }
    }

    /// Contract address of the ledger
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Human-readable collection name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ticker symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Number of live (minted and not burned) collectibles
    pub fn total_supply(&self) -> u64 {
        self.owners.len() as u64
    }

    /// The id the next mint will receive
    pub fn next_id(&self) -> TokenId {
        self.next_id
    }

    /// Whether `id` is minted and not burned
    pub fn exists(&self, id: TokenId) -> bool {
        self.owners.contains_key(&id)
    }

    /// Current owner of `id`
    pub fn owner_of(&self, id: TokenId) -> Result<Address, CollectibleError> {
        self.owners
            .get(&id)
            .copied()
            .ok_or(CollectibleError::NotFound(id))
    }

    /// Number of collectibles held by `account`
    pub fn balance_of(&self, account: &Address) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Operator approved for `id`, if any
    pub fn get_approved(&self, id: TokenId) -> Option<Address> {
        self.approvals.get(&id).copied()
    }

    /// Ids currently held by `owner`, ascending
    pub fn tokens_of(&self, owner: &Address) -> Vec<TokenId> {
        self.owners
            .iter()
            .filter(|(_, o)| *o == owner)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Sum of per-account balances; equals total_supply while consistent
    pub fn sum_of_balances(&self) -> u64 {
        self.balances.values().sum()
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
    ) -> Result<bool, CollectibleError> {
        Ok(self.roles.grant(LEDGER_NAME, caller, role, account)?)
    }

    /// Revoke `role` from `account`; `caller` must be an admin
    pub fn revoke_role(
        &mut self,
        caller: &Address,
        role: Role,
        account: &Address,
    ) -> Result<bool, CollectibleError> {
        Ok(self.roles.revoke(LEDGER_NAME, caller, role, account)?)
    }

    // ========================================================================
    // OWNERSHIP
    // ========================================================================

    /// Approve `spender` to move or burn `id`. Only the owner may approve.
    pub fn approve(
        &mut self,
        caller: &Address,
        spender: &Address,
        id: TokenId,
    ) -> Result<CollectibleEvent, CollectibleError> {
        let owner = self.owner_of(id)?;
        if owner != *caller {
            return Err(CollectibleError::NotOwner {
                id,
                account: *caller,
            });
        }
        if spender.is_zero() {
            return Err(CollectibleError::ZeroAddress);
        }
        self.approvals.insert(id, *spender);

        Ok(CollectibleEvent::Approval {
            owner,
            approved: *spender,
            id,
        })
    }

    /// Whether `operator` may move or burn `id`
    pub fn is_approved_or_owner(&self, operator: &Address, id: TokenId) -> bool {
        match self.owners.get(&id) {
            Some(owner) => owner == operator || self.approvals.get(&id) == Some(operator),
            None => false,
        }
    }

    /// Move `id` from `from` to `to`; `operator` must be the owner or approved.
    /// Clears any approval on `id`.
    pub fn transfer_from(
        &mut self,
        operator: &Address,
        from: &Address,
        to: &Address,
        id: TokenId,
    ) -> Result<CollectibleEvent, CollectibleError> {
        let owner = self.owner_of(id)?;
        if owner != *from {
            return Err(CollectibleError::NotOwner { id, account: *from });
        }
        if !self.is_approved_or_owner(operator, id) {
            return Err(CollectibleError::NotApproved {
                id,
                operator: *operator,
            });
        }
        if to.is_zero() {
            return Err(CollectibleError::ZeroAddress);
        }

        self.approvals.remove(&id);
        self.decrement_balance(from);
        *self.balances.entry(*to).or_insert(0) += 1;
        self.owners.insert(id, *to);

        Ok(CollectibleEvent::Transfer {
            from: *from,
            to: *to,
            id,
        })
    }

    // ========================================================================
    // SUPPLY
    // ========================================================================

    /// Mint a fresh collectible to `to`. `minter` must hold the Minter role.
    pub fn mint(
        &mut self,
        minter: &Address,
        to: &Address,
    ) -> Result<(TokenId, CollectibleEvent), CollectibleError> {
        self.roles.require(LEDGER_NAME, Role::Minter, minter)?;
        if to.is_zero() {
            return Err(CollectibleError::ZeroAddress);
        }

        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(CollectibleError::IdsExhausted)?;
        self.owners.insert(id, *to);
        *self.balances.entry(*to).or_insert(0) += 1;

        Ok((
            id,
            CollectibleEvent::Transfer {
                from: Address::ZERO,
                to: *to,
                id,
            },
        ))
    }

    /// Burn `id`. `operator` must be the owner or approved for it.
    pub fn burn(
        &mut self,
        operator: &Address,
        id: TokenId,
    ) -> Result<CollectibleEvent, CollectibleError> {
        let owner = self.owner_of(id)?;
        if !self.is_approved_or_owner(operator, id) {
            return Err(CollectibleError::NotApproved {
                id,
                operator: *operator,
            });
        }

        self.approvals.remove(&id);
        self.owners.remove(&id);
        self.decrement_balance(&owner);

        Ok(CollectibleEvent::Transfer {
            from: owner,
            to: Address::ZERO,
            id,
        })
    }

    fn decrement_balance(&mut self, account: &Address) {
        if let Some(balance) = self.balances.get_mut(account) {
            *balance = balance.saturating_sub(1);
            if *balance == 0 {
                self.balances.remove(account);
            }
        }
    }
}

impl MintCapability for CollectibleLedger {
    fn ledger_name(&self) -> &'static str {
        LEDGER_NAME
    }

    fn has_minter(&self, account: &Address) -> bool {
        self.roles.has_role(Role::Minter, account)
    }
}
