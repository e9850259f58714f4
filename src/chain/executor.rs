// Chain executor - admits signed transactions and runs them atomically
//
// Admission (signature, sender, nonce) happens outside the world snapshot: a
// refused transaction leaves no trace. Once admitted, the nonce is consumed
// and the call either commits in full or reverts in full.

use crate::chain::{
    Call, CodecError, Event, LedgerKind, Outcome, Receipt, SignedTransaction, TransactionBuilder,
    TxError, TxStatus, TxValidator, World,
};
use crate::chain::{AuditError, NativeBank};
use crate::identity::{Address, Keypair};
use crate::ledger::{CollectibleLedger, FungibleLedger, Role, TokenId};
use crate::shop::{ExchangeConfig, ShopError, TokenSale};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{info, warn};

const TOKEN_NAME: &str = "Shop Token";
const TOKEN_SYMBOL: &str = "SHOP";
const COLLECTIBLE_NAME: &str = "Shop Collectible";
const COLLECTIBLE_SYMBOL: &str = "SHOPC";

/// Deployer nonces consumed by contract creation: token, collectible, shop
const DEPLOYMENT_STEPS: u64 = 3;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Invalid exchange configuration: {0}")]
    Config(#[from] ShopError),

    #[error("Bootstrap transaction rejected: {0}")]
    Rejected(#[from] TxError),

    #[error("Granting the minter role on the {ledger:?} ledger reverted: {reason}")]
    GrantReverted { ledger: LedgerKind, reason: String },
}

/// A single-writer chain hosting one deployed shop
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Chain {
    world: World,
    nonces: HashMap<Address, u64>,
    receipts: Vec<Receipt>,
}

impl Chain {
    /// Deploy both ledgers and the shop, then grant the shop the minter role
    /// on each ledger with transactions signed by `deployer`.
    pub fn deploy(deployer: &Keypair, config: ExchangeConfig) -> Result<Self, DeployError> {
        let mut chain = Self::deploy_ungranted(deployer, config)?;
        let shop = *chain.sale().address();

        for ledger in [LedgerKind::Token, LedgerKind::Collectible] {
            let receipt = chain.call(
                deployer,
                Call::GrantMinter {
                    ledger,
                    account: shop,
                },
            )?;
            if let TxStatus::Reverted { reason, .. } = receipt.status() {
                return Err(DeployError::GrantReverted {
                    ledger,
                    reason: reason.clone(),
                });
            }
        }

        Ok(chain)
    }

    /// Deploy the contracts without granting any mint capability
    pub fn deploy_ungranted(
        deployer: &Keypair,
        config: ExchangeConfig,
    ) -> Result<Self, DeployError> {
        config.validate()?;

        let admin = deployer.address();
        let token_address = Address::contract(&admin, 0);
        let collectible_address = Address::contract(&admin, 1);
        let sale_address = Address::contract(&admin, 2);

        let token = FungibleLedger::new(token_address, admin, TOKEN_NAME, TOKEN_SYMBOL);
        let collectible =
            CollectibleLedger::new(collectible_address, admin, COLLECTIBLE_NAME, COLLECTIBLE_SYMBOL);
        let sale = TokenSale::new(sale_address, admin, config, token_address, collectible_address)?;

        let mut nonces = HashMap::new();
        nonces.insert(admin, DEPLOYMENT_STEPS);

        info!(
            owner = %admin,
            token = %token_address,
            collectible = %collectible_address,
            shop = %sale_address,
            ratio = config.ratio(),
            price = config.collectible_price(),
            "shop deployed"
        );

        Ok(Self {
            world: World::new(NativeBank::new(), token, collectible, sale),
            nonces,
            receipts: Vec::new(),
        })
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn sale(&self) -> &TokenSale {
        self.world.sale()
    }

    pub fn token(&self) -> &FungibleLedger {
        self.world.token()
    }

    pub fn collectible(&self) -> &CollectibleLedger {
        self.world.collectible()
    }

    pub fn native(&self) -> &NativeBank {
        self.world.native()
    }

    /// The shop's native balance
    pub fn native_reserve(&self) -> u128 {
        self.world.native_reserve()
    }

    /// The nonce the sender's next transaction must carry
    pub fn nonce_of(&self, account: &Address) -> u64 {
        self.nonces.get(account).copied().unwrap_or(0)
    }

    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    /// Number of executed transactions, committed or reverted
    pub fn height(&self) -> u64 {
        self.receipts.len() as u64
    }

    pub fn audit(&self) -> Result<(), AuditError> {
        self.world.audit()
    }

    // ========================================================================
    // EXECUTION
    // ========================================================================

    /// Genesis allocation of native currency to an externally owned account
    pub fn fund(&mut self, account: &Address, amount: u128) -> Result<(), ShopError> {
        if self.world.is_contract(account) {
            return Err(ShopError::ContractRecipient(*account));
        }
        self.world.native_mut().issue(account, amount)?;
        info!(%account, amount, "account funded");
        Ok(())
    }

    /// Sign `call` with the sender's next nonce and execute it
    pub fn call(&mut self, keypair: &Keypair, call: Call) -> Result<Receipt, TxError> {
        self.call_with_value(keypair, call, 0)
    }

    /// Like `call`, attaching `value` native units
    pub fn call_with_value(
        &mut self,
        keypair: &Keypair,
        call: Call,
        value: u128,
    ) -> Result<Receipt, TxError> {
        let signed = TransactionBuilder::new()
            .signer(keypair)
            .call(call)
            .nonce(self.nonce_of(&keypair.address()))
            .value(value)
            .build()?;
        self.execute(&signed)
    }

    /// Admit and execute a signed transaction.
    ///
    /// Returns Err only when admission fails. A call that fails during
    /// execution yields a reverted receipt.
    pub fn execute(&mut self, signed: &SignedTransaction) -> Result<Receipt, TxError> {
        let tx = signed.tx();
        let sender = *tx.sender();
        let tx_id = signed.id();
        let expected = self.nonce_of(&sender);

        if let Err(err) = TxValidator::validate(signed, expected) {
            warn!(tx = %tx_id, %sender, error = %err, "transaction refused");
            return Err(err);
        }
        self.nonces.insert(sender, expected + 1);

        let (status, events) = match dispatch(&mut self.world, sender, tx.value(), tx.call()) {
            Ok((outcome, events)) => {
                info!(tx = %tx_id, call = tx.call().name(), %sender, ?outcome, "transaction committed");
                (TxStatus::Committed(outcome), events)
            }
            Err(err) => {
                warn!(
                    tx = %tx_id,
                    call = tx.call().name(),
                    %sender,
                    kind = %err.kind(),
                    error = %err,
                    "transaction reverted"
                );
                let status = TxStatus::Reverted {
                    kind: err.kind(),
                    reason: err.to_string(),
                };
                (status, Vec::new())
            }
        };

        let receipt = Receipt::new(
            tx_id,
            sender,
            tx.nonce(),
            tx.call().name(),
            status,
            events,
            self.height(),
        );
        self.receipts.push(receipt.clone());
        Ok(receipt)
    }

    // ========================================================================
    // SERIALIZATION
    // ========================================================================

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        postcard::to_allocvec(self).map_err(|e| CodecError::EncodeError(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        postcard::from_bytes(bytes).map_err(|e| CodecError::DecodeError(e.to_string()))
    }
}

/// Route a call to the shop or a ledger inside one world transaction
fn dispatch(
    world: &mut World,
    sender: Address,
    value: u128,
    call: &Call,
) -> Result<(Outcome, Vec<Event>), ShopError> {
    if value > 0 && !call.is_payable() {
        return Err(ShopError::NonPayable);
    }

    match *call {
        Call::PurchaseTokens { amount } => world.transact(sender, value, |sale, ctx| {
            sale.purchase_tokens(ctx, amount).map(Outcome::Minted)
        }),
        Call::BurnTokens { amount } => world.transact(sender, value, |sale, ctx| {
            sale.burn_tokens(ctx, amount).map(Outcome::Payout)
        }),
        Call::PurchaseCollectible => world.transact(sender, value, |sale, ctx| {
            sale.purchase_collectible(ctx).map(Outcome::Collectible)
        }),
        Call::BurnCollectible { id } => world.transact(sender, value, |sale, ctx| {
            sale.burn_collectible(ctx, id).map(Outcome::Share)
        }),
        Call::Withdraw { amount } => world.transact(sender, value, |sale, ctx| {
            sale.withdraw(ctx, amount).map(Outcome::Withdrawn)
        }),
        Call::ApproveTokens { spender, amount } => world.transact(sender, value, |_, ctx| {
            let event = ctx.token.approve(&sender, &spender, amount)?;
            ctx.emit(event);
            Ok(Outcome::Done)
        }),
        Call::TransferTokens { to, amount } => world.transact(sender, value, |_, ctx| {
            let event = ctx.token.transfer(&sender, &to, amount)?;
            ctx.emit(event);
            Ok(Outcome::Done)
        }),
        Call::ApproveCollectible { spender, id } => world.transact(sender, value, |_, ctx| {
            let event = ctx.collectible.approve(&sender, &spender, id)?;
            ctx.emit(event);
            Ok(Outcome::Done)
        }),
        Call::TransferCollectible { to, id } => transfer_collectible(world, sender, to, id),
        Call::GrantMinter { ledger, account } => set_minter(world, sender, ledger, account, true),
        Call::RevokeMinter { ledger, account } => set_minter(world, sender, ledger, account, false),
        Call::TransferNative { to } => {
            if world.is_contract(&to) {
                return Err(ShopError::ContractRecipient(to));
            }
            world.transact(sender, value, |_, ctx| {
                let event = ctx.native.transfer(&sender, &to, value)?;
                ctx.emit(event);
                Ok(Outcome::Done)
            })
        }
    }
}

fn transfer_collectible(
    world: &mut World,
    sender: Address,
    to: Address,
    id: TokenId,
) -> Result<(Outcome, Vec<Event>), ShopError> {
    world.transact(sender, 0, |_, ctx| {
        let event = ctx.collectible.transfer_from(&sender, &sender, &to, id)?;
        ctx.emit(event);
        Ok(Outcome::Done)
    })
}

fn set_minter(
    world: &mut World,
    sender: Address,
    ledger: LedgerKind,
    account: Address,
    grant: bool,
) -> Result<(Outcome, Vec<Event>), ShopError> {
    world.transact(sender, 0, |_, ctx| {
        let changed = match (ledger, grant) {
            (LedgerKind::Token, true) => ctx.token.grant_role(&sender, Role::Minter, account)?,
            (LedgerKind::Token, false) => ctx.token.revoke_role(&sender, Role::Minter, &account)?,
            (LedgerKind::Collectible, true) => {
                ctx.collectible.grant_role(&sender, Role::Minter, account)?
            }
            (LedgerKind::Collectible, false) => {
                ctx.collectible
                    .revoke_role(&sender, Role::Minter, &account)?
            }
        };

        if changed {
            ctx.emit(Event::RoleChanged {
                ledger,
                role: Role::Minter,
                account,
                granted: grant,
            });
        }
        Ok(Outcome::Done)
    })
}
