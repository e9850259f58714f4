// AccessGate - role registry and the mint capability check
//
// Every ledger that accepts mints carries a RoleRegistry. Callers that want to
// mint on a ledger go through AccessGate::require_minter first, and the ledger
// checks the role again inside mint itself.

use crate::identity::Address;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Capabilities tracked per ledger
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// May grant and revoke roles
    Admin,
    /// May mint new units or items
    Minter,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::Minter => write!(f, "MINTER"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("{account} is missing role {role} on {ledger}")]
    MissingRole {
        ledger: &'static str,
        account: Address,
        role: Role,
    },
}

/// Role membership for a single ledger
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoleRegistry {
    members: HashMap<Role, HashSet<Address>>,
}

impl RoleRegistry {
    /// Registry whose only member is `admin`, holding the Admin role
    pub fn with_admin(admin: Address) -> Self {
        let mut registry = Self::default();
        registry.insert(Role::Admin, admin);
        registry
    }

    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        self.members
            .get(&role)
            .map(|set| set.contains(account))
            .unwrap_or(false)
    }

    /// Fail with MissingRole unless `account` holds `role`
    pub fn require(
        &self,
        ledger: &'static str,
        role: Role,
        account: &Address,
    ) -> Result<(), AccessError> {
        if self.has_role(role, account) {
            Ok(())
        } else {
            Err(AccessError::MissingRole {
                ledger,
                account: *account,
                role,
            })
        }
    }

    /// Grant `role` to `account`. Only admins may grant.
    /// Returns false if the account already held the role.
    pub fn grant(
        &mut self,
        ledger: &'static str,
        caller: &Address,
        role: Role,
        account: Address,
    ) -> Result<bool, AccessError> {
        self.require(ledger, Role::Admin, caller)?;
        Ok(self.insert(role, account))
    }

    /// Revoke `role` from `account`. Only admins may revoke.
    /// Returns false if the account did not hold the role.
    pub fn revoke(
        &mut self,
        ledger: &'static str,
        caller: &Address,
        role: Role,
        account: &Address,
    ) -> Result<bool, AccessError> {
        self.require(ledger, Role::Admin, caller)?;
        Ok(self
            .members
            .get_mut(&role)
            .map(|set| set.remove(account))
            .unwrap_or(false))
    }

    fn insert(&mut self, role: Role, account: Address) -> bool {
        self.members.entry(role).or_default().insert(account)
    }
}

/// A ledger that gates minting behind the Minter role
pub trait MintCapability {
    /// Human-readable ledger name used in error messages
    fn ledger_name(&self) -> &'static str;

    /// Whether `account` currently holds the Minter role
    fn has_minter(&self, account: &Address) -> bool;
}

/// Synchronous capability check performed before every mint
pub struct AccessGate;

impl AccessGate {
    pub fn require_minter<L>(ledger: &L, minter: &Address) -> Result<(), AccessError>
    where
        L: MintCapability + ?Sized,
    {
        if ledger.has_minter(minter) {
            Ok(())
        } else {
            Err(AccessError::MissingRole {
                ledger: ledger.ledger_name(),
                account: *minter,
                role: Role::Minter,
            })
        }
    }
}
