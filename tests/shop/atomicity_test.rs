// Atomicity Tests
// A failing call leaves every ledger exactly as it was

use tokenshop::chain::{Call, Chain, LedgerKind};
use tokenshop::identity::Keypair;
use tokenshop::ledger::Role;
use tokenshop::shop::{ErrorKind, ExchangeConfig};

/// Balances and counters observable from outside the shop
#[derive(Debug, PartialEq)]
struct Snapshot {
    native: u128,
    tokens: u128,
    allowance: u128,
    reserve: u128,
    token_supply: u128,
    collectible_supply: u64,
    next_id: u64,
    pool: u128,
}

fn snapshot(chain: &Chain, account: &Keypair) -> Snapshot {
    let address = account.address();
    Snapshot {
        native: chain.native().balance_of(&address),
        tokens: chain.token().balance_of(&address),
        allowance: chain.token().allowance(&address, chain.sale().address()),
        reserve: chain.native_reserve(),
        token_supply: chain.token().total_supply(),
        collectible_supply: chain.collectible().total_supply(),
        next_id: chain.collectible().next_id(),
        pool: chain.sale().pool_balance(),
    }
}

fn setup() -> (Chain, Keypair, Keypair) {
    let owner = Keypair::generate();
    let buyer = Keypair::generate();
    let mut chain = Chain::deploy(&owner, ExchangeConfig::new(5, 2).unwrap()).unwrap();
    let shop = *chain.sale().address();

    chain.fund(&buyer.address(), 100).unwrap();
    chain
        .call_with_value(&buyer, Call::PurchaseTokens { amount: 50 }, 50)
        .unwrap();
    chain
        .call(&buyer, Call::ApproveTokens { spender: shop, amount: 10 })
        .unwrap();
    (chain, owner, buyer)
}

#[test]
fn test_failed_mint_rolls_back_payment() {
    let (mut chain, owner, buyer) = setup();
    let shop = *chain.sale().address();
    chain
        .call(
            &owner,
            Call::RevokeMinter {
                ledger: LedgerKind::Collectible,
                account: shop,
            },
        )
        .unwrap();
    let before = snapshot(&chain, &buyer);

    let receipt = chain.call(&buyer, Call::PurchaseCollectible).unwrap();

    assert_eq!(receipt.error_kind(), Some(ErrorKind::Authorization));
    assert!(receipt.events().is_empty());
    assert_eq!(snapshot(&chain, &buyer), before);
    assert!(chain.audit().is_ok());
}

#[test]
fn test_failed_token_mint_rolls_back_deposit() {
    let (mut chain, owner, buyer) = setup();
    let shop = *chain.sale().address();
    chain
        .call(
            &owner,
            Call::RevokeMinter {
                ledger: LedgerKind::Token,
                account: shop,
            },
        )
        .unwrap();
    assert!(!chain.token().has_role(Role::Minter, &shop));
    let before = snapshot(&chain, &buyer);

    let receipt = chain
        .call_with_value(&buyer, Call::PurchaseTokens { amount: 20 }, 20)
        .unwrap();

    assert_eq!(receipt.error_kind(), Some(ErrorKind::Authorization));
    assert_eq!(snapshot(&chain, &buyer), before);
    assert_eq!(chain.sale().total_deposits(), 50);
}

#[test]
fn test_revert_keeps_receipt_and_consumes_nonce() {
    let (mut chain, _, buyer) = setup();
    let height = chain.height();
    let nonce = chain.nonce_of(&buyer.address());
    let before = snapshot(&chain, &buyer);

    let receipt = chain.call(&buyer, Call::Withdraw { amount: 1 }).unwrap();

    assert!(!receipt.is_success());
    assert!(receipt.reason().is_some());
    assert_eq!(chain.height(), height + 1);
    assert_eq!(chain.nonce_of(&buyer.address()), nonce + 1);
    assert_eq!(snapshot(&chain, &buyer), before);
}

#[test]
fn test_committed_call_records_events() {
    let (mut chain, _, buyer) = setup();

    let receipt = chain.call(&buyer, Call::PurchaseCollectible).unwrap();

    // token transfer, collectible mint, shop event
    assert_eq!(receipt.events().len(), 3);
    assert_eq!(chain.receipts().last().map(|r| r.tx_id()), Some(receipt.tx_id()));
}
