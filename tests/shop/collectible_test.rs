// Collectible Pool Tests
// purchase_collectible / burn_collectible and the floor-rounded pool share

use tokenshop::chain::{Call, Chain, Outcome};
use tokenshop::identity::Keypair;
use tokenshop::ledger::TokenId;
use tokenshop::shop::{ErrorKind, ExchangeConfig};

/// Deploy with ratio 5 and the given price, then give `buyer` `tokens` tokens
/// with the shop approved to spend all of them
fn setup(price: u128, tokens: u128) -> (Chain, Keypair, Keypair) {
    let owner = Keypair::generate();
    let buyer = Keypair::generate();
    let config = ExchangeConfig::new(5, price).unwrap();
    let mut chain = Chain::deploy(&owner, config).unwrap();
    let shop = *chain.sale().address();

    let deposit = tokens * 5;
    chain.fund(&buyer.address(), deposit).unwrap();
    chain
        .call_with_value(&buyer, Call::PurchaseTokens { amount: deposit }, deposit)
        .unwrap();
    chain
        .call(&buyer, Call::ApproveTokens { spender: shop, amount: tokens })
        .unwrap();

    (chain, owner, buyer)
}

fn buy(chain: &mut Chain, buyer: &Keypair) -> TokenId {
    let receipt = chain.call(buyer, Call::PurchaseCollectible).unwrap();
    assert!(receipt.is_success(), "purchase failed: {:?}", receipt.reason());
    receipt.outcome().and_then(Outcome::collectible_id).unwrap()
}

fn burn(chain: &mut Chain, holder: &Keypair, id: TokenId) -> u128 {
    let shop = *chain.sale().address();
    chain
        .call(holder, Call::ApproveCollectible { spender: shop, id })
        .unwrap();
    let receipt = chain.call(holder, Call::BurnCollectible { id }).unwrap();
    assert!(receipt.is_success(), "burn failed: {:?}", receipt.reason());
    receipt.outcome().and_then(Outcome::amount).unwrap()
}

// ============================================================================
// PURCHASE
// ============================================================================

#[test]
fn test_purchase_moves_price_into_pool() {
    let (mut chain, _, buyer) = setup(3, 10);

    let id = buy(&mut chain, &buyer);

    assert_eq!(chain.collectible().owner_of(id).unwrap(), buyer.address());
    assert_eq!(chain.sale().pool_balance(), 3);
    assert_eq!(chain.token().balance_of(&buyer.address()), 7);
    assert_eq!(chain.token().balance_of(chain.sale().address()), 3);
    // paid tokens stay in supply, held by the shop
    assert_eq!(chain.token().total_supply(), 10);
    assert!(chain.audit().is_ok());
}

#[test]
fn test_purchase_with_insufficient_tokens_reverts() {
    let (mut chain, _, buyer) = setup(3, 2);

    let receipt = chain.call(&buyer, Call::PurchaseCollectible).unwrap();

    assert_eq!(receipt.error_kind(), Some(ErrorKind::InsufficientFunds));
    assert_eq!(chain.collectible().total_supply(), 0);
    assert_eq!(chain.collectible().next_id(), 0);
    assert_eq!(chain.sale().pool_balance(), 0);
}

#[test]
fn test_two_buyers_share_pool() {
    let (mut chain, _, buyer) = setup(1, 2);

    let first = buy(&mut chain, &buyer);
    let second = buy(&mut chain, &buyer);
    assert_eq!(chain.sale().pool_balance(), 2);

    assert_eq!(burn(&mut chain, &buyer, first), 1);
    assert_eq!(chain.sale().pool_balance(), 1);

    assert_eq!(burn(&mut chain, &buyer, second), 1);
    assert_eq!(chain.sale().pool_balance(), 0);
    assert_eq!(chain.token().balance_of(&buyer.address()), 2);
    assert_eq!(chain.collectible().total_supply(), 0);
    assert!(chain.audit().is_ok());
}

#[test]
fn test_share_floor_keeps_remainder_for_last_holder() {
    let (mut chain, owner, buyer) = setup(7, 21);
    let ids: Vec<TokenId> = (0..3).map(|_| buy(&mut chain, &buyer)).collect();
    assert_eq!(chain.sale().pool_balance(), 21);

    // leave 20 in the pool so it no longer divides evenly by 3
    chain.call(&owner, Call::Withdraw { amount: 1 }).unwrap();

    assert_eq!(burn(&mut chain, &buyer, ids[0]), 6);
    assert_eq!(chain.sale().pool_balance(), 14);
    assert_eq!(burn(&mut chain, &buyer, ids[1]), 7);
    assert_eq!(burn(&mut chain, &buyer, ids[2]), 7);
    assert_eq!(chain.sale().pool_balance(), 0);
    assert!(chain.audit().is_ok());
}

#[test]
fn test_burn_requires_ownership() {
    let (mut chain, _, buyer) = setup(1, 1);
    let id = buy(&mut chain, &buyer);
    let mallory = Keypair::generate();

    let receipt = chain.call(&mallory, Call::BurnCollectible { id }).unwrap();

    assert_eq!(receipt.error_kind(), Some(ErrorKind::NotFound));
    assert!(chain.collectible().exists(id));
    assert_eq!(chain.sale().pool_balance(), 1);
}

#[test]
fn test_burn_unknown_collectible_is_not_found() {
    let (mut chain, _, buyer) = setup(1, 1);

    let receipt = chain.call(&buyer, Call::BurnCollectible { id: 42 }).unwrap();

    assert_eq!(receipt.error_kind(), Some(ErrorKind::NotFound));
}

#[test]
fn test_burn_requires_shop_approval() {
    let (mut chain, _, buyer) = setup(1, 1);
    let id = buy(&mut chain, &buyer);

    let receipt = chain.call(&buyer, Call::BurnCollectible { id }).unwrap();

    assert_eq!(receipt.error_kind(), Some(ErrorKind::Authorization));
    assert!(chain.collectible().exists(id));
    assert_eq!(chain.sale().pool_balance(), 1);
    assert_eq!(chain.token().balance_of(&buyer.address()), 0);
}

#[test]
fn test_ids_are_never_reused() {
    let (mut chain, _, buyer) = setup(1, 2);

    let first = buy(&mut chain, &buyer);
    burn(&mut chain, &buyer, first);
    let second = buy(&mut chain, &buyer);

    assert_eq!(first, 0);
    assert_eq!(second, 1);
    assert!(!chain.collectible().exists(first));
}

#[test]
fn test_transferred_collectible_pays_new_holder() {
    let (mut chain, _, buyer) = setup(4, 4);
    let id = buy(&mut chain, &buyer);
    let bob = Keypair::generate();

    chain
        .call(&buyer, Call::TransferCollectible { to: bob.address(), id })
        .unwrap();
    let share = burn(&mut chain, &bob, id);

    assert_eq!(share, 4);
    assert_eq!(chain.token().balance_of(&bob.address()), 4);
}
