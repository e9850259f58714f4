use tokenshop::identity::{Address, Keypair};
use tokenshop::ledger::{CollectibleError, CollectibleLedger, Role};

fn ledger() -> (CollectibleLedger, Address) {
    let admin = Keypair::generate().address();
    let minter = Keypair::generate().address();
    let mut ledger =
        CollectibleLedger::new(Address::contract(&admin, 1), admin, "Collectible", "COL");
    ledger.grant_role(&admin, Role::Minter, minter).unwrap();
    (ledger, minter)
}

#[test]
fn test_mint_assigns_sequential_ids() {
    let (mut ledger, minter) = ledger();
    let alice = Keypair::generate().address();

    let (first, _) = ledger.mint(&minter, &alice).unwrap();
    let (second, _) = ledger.mint(&minter, &alice).unwrap();

    assert_eq!((first, second), (0, 1));
    assert_eq!(ledger.balance_of(&alice), 2);
    assert_eq!(ledger.tokens_of(&alice), vec![0, 1]);
    assert_eq!(ledger.total_supply(), 2);
}

#[test]
fn test_mint_requires_role() {
    let (mut ledger, _) = ledger();
    let alice = Keypair::generate().address();

    assert!(matches!(
        ledger.mint(&alice, &alice),
        Err(CollectibleError::Access(_))
    ));
    assert_eq!(ledger.next_id(), 0);
}

#[test]
fn test_burn_needs_owner_or_approval() {
    let (mut ledger, minter) = ledger();
    let alice = Keypair::generate().address();
    let operator = Keypair::generate().address();
    let (id, _) = ledger.mint(&minter, &alice).unwrap();

    assert_eq!(
        ledger.burn(&operator, id),
        Err(CollectibleError::NotApproved { id, operator })
    );

    ledger.approve(&alice, &operator, id).unwrap();
    ledger.burn(&operator, id).unwrap();

    assert!(!ledger.exists(id));
    assert_eq!(ledger.total_supply(), 0);
    assert_eq!(ledger.owner_of(id), Err(CollectibleError::NotFound(id)));
}

#[test]
fn test_burned_id_is_not_reissued() {
    let (mut ledger, minter) = ledger();
    let alice = Keypair::generate().address();
    let (id, _) = ledger.mint(&minter, &alice).unwrap();
    ledger.burn(&alice, id).unwrap();

    let (next, _) = ledger.mint(&minter, &alice).unwrap();

    assert_eq!(next, id + 1);
}

#[test]
fn test_only_owner_may_approve() {
    let (mut ledger, minter) = ledger();
    let alice = Keypair::generate().address();
    let mallory = Keypair::generate().address();
    let (id, _) = ledger.mint(&minter, &alice).unwrap();

    assert_eq!(
        ledger.approve(&mallory, &mallory, id),
        Err(CollectibleError::NotOwner {
            id,
            account: mallory
        })
    );
}

#[test]
fn test_transfer_clears_approval() {
    let (mut ledger, minter) = ledger();
    let alice = Keypair::generate().address();
    let bob = Keypair::generate().address();
    let operator = Keypair::generate().address();
    let (id, _) = ledger.mint(&minter, &alice).unwrap();
    ledger.approve(&alice, &operator, id).unwrap();

    ledger.transfer_from(&alice, &alice, &bob, id).unwrap();

    assert_eq!(ledger.owner_of(id), Ok(bob));
    assert_eq!(ledger.get_approved(id), None);
    assert!(!ledger.is_approved_or_owner(&operator, id));
    assert_eq!(ledger.sum_of_balances(), ledger.total_supply());
}
