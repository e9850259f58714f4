use tokenshop::chain::{Call, Chain, Event, LedgerKind, TransactionBuilder, TxError};
use tokenshop::identity::Keypair;
use tokenshop::ledger::Role;
use tokenshop::shop::{ErrorKind, ExchangeConfig, ShopError, ShopEvent};

fn deploy() -> (Chain, Keypair) {
    let owner = Keypair::generate();
    let chain = Chain::deploy(&owner, ExchangeConfig::default()).unwrap();
    (chain, owner)
}

// ============================================================================
// DEPLOYMENT
// ============================================================================

#[test]
fn test_deploy_wires_shop_to_ledgers() {
    let (chain, owner) = deploy();
    let sale = chain.sale();

    assert_eq!(sale.owner(), &owner.address());
    assert_eq!(sale.payment_token_address(), chain.token().address());
    assert_eq!(sale.collectible_token_address(), chain.collectible().address());
    assert_eq!(sale.exchange_ratio(), 5);
    assert_eq!(sale.collectible_price(), 1);
    assert!(chain.token().has_role(Role::Minter, sale.address()));
    assert!(chain.collectible().has_role(Role::Minter, sale.address()));
    assert!(chain.receipts().iter().all(|r| r.is_success()));
    assert!(chain.audit().is_ok());
}

#[test]
fn test_deploy_rejects_zero_ratio() {
    let owner = Keypair::generate();
    let config = ExchangeConfig::default().with_ratio(0);

    assert!(Chain::deploy(&owner, config).is_err());
}

#[test]
fn test_only_admin_grants_minter() {
    let (mut chain, _) = deploy();
    let mallory = Keypair::generate();

    let receipt = chain
        .call(
            &mallory,
            Call::GrantMinter {
                ledger: LedgerKind::Token,
                account: mallory.address(),
            },
        )
        .unwrap();

    assert_eq!(receipt.error_kind(), Some(ErrorKind::Authorization));
    assert!(!chain.token().has_role(Role::Minter, &mallory.address()));
}

// ============================================================================
// ADMISSION
// ============================================================================

#[test]
fn test_replayed_transaction_is_refused() {
    let (mut chain, _) = deploy();
    let alice = Keypair::generate();
    chain.fund(&alice.address(), 10).unwrap();
    let signed = TransactionBuilder::new()
        .signer(&alice)
        .call(Call::PurchaseTokens { amount: 10 })
        .nonce(0)
        .value(10)
        .build()
        .unwrap();

    chain.execute(&signed).unwrap();
    let height = chain.height();
    let replay = chain.execute(&signed);

    assert_eq!(
        replay.unwrap_err(),
        TxError::NonceMismatch {
            expected: 1,
            got: 0
        }
    );
    assert_eq!(chain.height(), height);
    assert_eq!(chain.native_reserve(), 10);
}

#[test]
fn test_refused_transaction_leaves_nonce() {
    let (mut chain, _) = deploy();
    let alice = Keypair::generate();
    let signed = TransactionBuilder::new()
        .signer(&alice)
        .call(Call::PurchaseCollectible)
        .nonce(5)
        .build()
        .unwrap();

    assert!(chain.execute(&signed).is_err());
    assert_eq!(chain.nonce_of(&alice.address()), 0);
}

// ============================================================================
// EXECUTION
// ============================================================================

#[test]
fn test_receipt_describes_commit() {
    let (mut chain, _) = deploy();
    let alice = Keypair::generate();
    chain.fund(&alice.address(), 10).unwrap();

    let receipt = chain
        .call_with_value(&alice, Call::PurchaseTokens { amount: 10 }, 10)
        .unwrap();

    assert_eq!(receipt.sender(), &alice.address());
    assert_eq!(receipt.nonce(), 0);
    assert_eq!(receipt.call(), Call::PurchaseTokens { amount: 10 }.name());
    assert_eq!(receipt.height(), 2);
    assert!(receipt.events().contains(&Event::Shop(ShopEvent::TokensPurchased {
        buyer: alice.address(),
        deposit: 10,
        minted: 2,
    })));
}

#[test]
fn test_native_transfer_between_accounts() {
    let (mut chain, _) = deploy();
    let alice = Keypair::generate();
    let bob = Keypair::generate();
    chain.fund(&alice.address(), 10).unwrap();

    let receipt = chain
        .call_with_value(&alice, Call::TransferNative { to: bob.address() }, 4)
        .unwrap();

    assert!(receipt.is_success());
    assert_eq!(chain.native().balance_of(&alice.address()), 6);
    assert_eq!(chain.native().balance_of(&bob.address()), 4);
}

#[test]
fn test_native_transfer_to_shop_reverts() {
    let (mut chain, _) = deploy();
    let alice = Keypair::generate();
    let shop = *chain.sale().address();
    chain.fund(&alice.address(), 10).unwrap();

    let receipt = chain
        .call_with_value(&alice, Call::TransferNative { to: shop }, 4)
        .unwrap();

    assert_eq!(receipt.error_kind(), Some(ErrorKind::InvariantViolation));
    assert_eq!(chain.native_reserve(), 0);
    assert!(chain.audit().is_ok());
}

#[test]
fn test_funding_contract_is_rejected() {
    let (mut chain, _) = deploy();
    let token = *chain.token().address();

    assert_eq!(
        chain.fund(&token, 1),
        Err(ShopError::ContractRecipient(token))
    );
}

#[test]
fn test_audit_holds_through_full_cycle() {
    let (mut chain, owner) = deploy();
    let alice = Keypair::generate();
    let shop = *chain.sale().address();
    chain.fund(&alice.address(), 100).unwrap();

    chain
        .call_with_value(&alice, Call::PurchaseTokens { amount: 100 }, 100)
        .unwrap();
    chain
        .call(&alice, Call::ApproveTokens { spender: shop, amount: 20 })
        .unwrap();
    chain.call(&alice, Call::PurchaseCollectible).unwrap();
    chain.call(&alice, Call::PurchaseCollectible).unwrap();
    assert!(chain.audit().is_ok());

    chain.call(&owner, Call::Withdraw { amount: 1 }).unwrap();
    chain
        .call(&alice, Call::ApproveCollectible { spender: shop, id: 0 })
        .unwrap();
    chain.call(&alice, Call::BurnCollectible { id: 0 }).unwrap();
    chain.call(&alice, Call::BurnTokens { amount: 10 }).unwrap();

    assert!(chain.audit().is_ok());
    assert_eq!(chain.native_reserve(), 50);
    // floor(1 / 2) paid nothing, so the remaining unit stays pooled
    assert_eq!(chain.sale().pool_balance(), 1);
}
