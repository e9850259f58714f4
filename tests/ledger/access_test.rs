use tokenshop::identity::{Address, Keypair};
use tokenshop::ledger::{AccessError, AccessGate, FungibleLedger, Role, RoleRegistry};

fn address() -> Address {
    Keypair::generate().address()
}

// ============================================================================
// ROLE REGISTRY
// ============================================================================

#[test]
fn test_admin_grants_and_revokes() {
    let admin = address();
    let minter = address();
    let mut registry = RoleRegistry::with_admin(admin);

    assert!(registry.grant("test", &admin, Role::Minter, minter).unwrap());
    assert!(registry.has_role(Role::Minter, &minter));
    // granting twice reports no change
    assert!(!registry.grant("test", &admin, Role::Minter, minter).unwrap());

    assert!(registry.revoke("test", &admin, Role::Minter, &minter).unwrap());
    assert!(!registry.has_role(Role::Minter, &minter));
}

#[test]
fn test_non_admin_cannot_grant() {
    let admin = address();
    let outsider = address();
    let mut registry = RoleRegistry::with_admin(admin);

    let result = registry.grant("test", &outsider, Role::Minter, outsider);

    assert_eq!(
        result,
        Err(AccessError::MissingRole {
            ledger: "test",
            account: outsider,
            role: Role::Admin,
        })
    );
    assert!(!registry.has_role(Role::Minter, &outsider));
}

// ============================================================================
// ACCESS GATE
// ============================================================================

#[test]
fn test_gate_follows_minter_role() {
    let admin = address();
    let shop = address();
    let mut ledger = FungibleLedger::new(address(), admin, "Token", "TKN");

    assert!(AccessGate::require_minter(&ledger, &shop).is_err());

    ledger.grant_role(&admin, Role::Minter, shop).unwrap();
    assert!(AccessGate::require_minter(&ledger, &shop).is_ok());

    ledger.revoke_role(&admin, Role::Minter, &shop).unwrap();
    assert!(matches!(
        AccessGate::require_minter(&ledger, &shop),
        Err(AccessError::MissingRole { role: Role::Minter, .. })
    ));
}

#[test]
fn test_admin_is_not_implicitly_minter() {
    let admin = address();
    let ledger = FungibleLedger::new(address(), admin, "Token", "TKN");

    assert!(ledger.has_role(Role::Admin, &admin));
    assert!(AccessGate::require_minter(&ledger, &admin).is_err());
}
