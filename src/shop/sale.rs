// TokenSale - the deployed shop contract
//
// Every operation follows the same order: validate, update the shop's own
// state, then call out to the external ledgers. Operations only run inside
// World::transact, so a failure at any step discards everything before it.

use crate::chain::CallContext;
use crate::identity::Address;
use crate::ledger::{AccessGate, TokenId};
use crate::shop::{ExchangeConfig, ShopError, ShopEvent};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Share of the pool paid out for one burned collectible.
///
/// Integer division truncates, so the remainder `pool % outstanding` always
/// stays in the pool. With one collectible outstanding the holder receives the
/// whole pool.
pub fn pool_share(pool_balance: u128, outstanding: u64) -> Result<u128, ShopError> {
    if outstanding == 0 {
        return Err(ShopError::NoOutstandingCollectibles);
    }
    Ok(pool_balance / u128::from(outstanding))
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenSale {
    address: Address,
    owner: Address,
    config: ExchangeConfig,
    payment_token: Address,
    collectible_token: Address,
    /// Token units held on behalf of outstanding collectibles
    pool_balance: u128,
    /// Native units ever received through purchase_tokens
    total_deposits: u128,
    /// Native units ever paid out through burn_tokens
    total_payouts: u128,
}

impl TokenSale {
    /// Deploy the shop at `address`; fails on an invalid config
    pub fn new(
        address: Address,
        owner: Address,
        config: ExchangeConfig,
        payment_token: Address,
        collectible_token: Address,
    ) -> Result<Self, ShopError> {
        config.validate()?;
        Ok(Self {
            address,
            owner,
            config,
            payment_token,
            collectible_token,
            pool_balance: 0,
            total_deposits: 0,
            total_payouts: 0,
        })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Contract address of the shop
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Deployer, the only account allowed to withdraw
    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Native units per token
    pub fn exchange_ratio(&self) -> u128 {
        self.config.ratio()
    }

    /// Tokens per collectible
    pub fn collectible_price(&self) -> u128 {
        self.config.collectible_price()
    }

    /// Address of the fungible ledger the shop mints on
    pub fn payment_token_address(&self) -> &Address {
        &self.payment_token
    }

    /// Address of the collectible ledger the shop mints on
    pub fn collectible_token_address(&self) -> &Address {
        &self.collectible_token
    }

    /// Tokens currently pooled for collectible holders
    pub fn pool_balance(&self) -> u128 {
        self.pool_balance
    }

    /// Native units received over the shop's lifetime
    pub fn total_deposits(&self) -> u128 {
        self.total_deposits
    }

    /// Native units paid out over the shop's lifetime
    pub fn total_payouts(&self) -> u128 {
        self.total_payouts
    }

    // ========================================================================
    // EXCHANGE: NATIVE <-> TOKEN
    // ========================================================================

    /// Exchange the attached native value for `floor(deposit / ratio)` tokens.
    ///
    /// A deposit smaller than the ratio mints nothing and is still kept.
    pub fn purchase_tokens(
        &mut self,
        ctx: &mut CallContext<'_>,
        deposit_amount: u128,
    ) -> Result<u128, ShopError> {
        let buyer = ctx.caller();
        let attached = ctx.value();
        if attached != deposit_amount {
            return Err(ShopError::DepositMismatch {
                declared: deposit_amount,
                attached,
            });
        }

        let minted = deposit_amount / self.config.ratio();
        let total_deposits = self
            .total_deposits
            .checked_add(deposit_amount)
            .ok_or(ShopError::Overflow)?;

        let event = ctx.native.transfer(&buyer, &self.address, deposit_amount)?;
        ctx.emit(event);
        self.total_deposits = total_deposits;

        AccessGate::require_minter(&*ctx.token, &self.address)?;
        let event = ctx.token.mint(&self.address, &buyer, minted)?;
        ctx.emit(event);

        debug!(%buyer, deposit_amount, minted, "tokens purchased");
        ctx.emit(ShopEvent::TokensPurchased {
            buyer,
            deposit: deposit_amount,
            minted,
        });
        Ok(minted)
    }

    /// Burn `token_amount` of the caller's tokens and pay out `token_amount * ratio`.
    ///
    /// The caller must have approved the shop for `token_amount`. The burn is
    /// final before any native value leaves the shop.
    pub fn burn_tokens(
        &mut self,
        ctx: &mut CallContext<'_>,
        token_amount: u128,
    ) -> Result<u128, ShopError> {
        let holder = ctx.caller();
        if token_amount == 0 {
            return Err(ShopError::InvalidAmount("burn amount cannot be zero".to_string()));
        }

        let payout = token_amount
            .checked_mul(self.config.ratio())
            .ok_or(ShopError::Overflow)?;
        let reserve = ctx.native.balance_of(&self.address);
        if reserve < payout {
            return Err(ShopError::InsufficientReserve { reserve, payout });
        }
        let total_payouts = self
            .total_payouts
            .checked_add(payout)
            .ok_or(ShopError::Overflow)?;

        let event = ctx.token.burn_from(&self.address, &holder, token_amount)?;
        ctx.emit(event);
        self.total_payouts = total_payouts;

        let event = ctx.native.transfer(&self.address, &holder, payout)?;
        ctx.emit(event);

        debug!(%holder, token_amount, payout, "tokens burned");
        ctx.emit(ShopEvent::TokensBurned {
            holder,
            amount: token_amount,
            payout,
        });
        Ok(payout)
    }

    // ========================================================================
    // POOL: TOKEN <-> COLLECTIBLE
    // ========================================================================

    /// Charge the collectible price into the pool and mint one collectible.
    ///
    /// The payment is transferred to the shop, not burned, so the pool stays
    /// backed by live token supply.
    pub fn purchase_collectible(
        &mut self,
        ctx: &mut CallContext<'_>,
    ) -> Result<TokenId, ShopError> {
        let buyer = ctx.caller();
        let price = self.config.collectible_price();
        let pool_balance = self
            .pool_balance
            .checked_add(price)
            .ok_or(ShopError::Overflow)?;

        let event = ctx
            .token
            .transfer_from(&self.address, &buyer, &self.address, price)?;
        ctx.emit(event);
        self.pool_balance = pool_balance;

        AccessGate::require_minter(&*ctx.collectible, &self.address)?;
        let (id, event) = ctx.collectible.mint(&self.address, &buyer)?;
        ctx.emit(event);

        debug!(%buyer, id, price, pool_balance, "collectible purchased");
        ctx.emit(ShopEvent::CollectiblePurchased { buyer, id, price });
        Ok(id)
    }

    /// Burn collectible `id` and pay its holder `floor(pool / outstanding)`.
    ///
    /// `outstanding` counts live collectibles before this burn. The caller
    /// must own `id` and have approved the shop for it.
    pub fn burn_collectible(
        &mut self,
        ctx: &mut CallContext<'_>,
        id: TokenId,
    ) -> Result<u128, ShopError> {
        let holder = ctx.caller();
        let owner = ctx.collectible.owner_of(id)?;
        if owner != holder {
            return Err(ShopError::NotCollectibleOwner {
                id,
                account: holder,
            });
        }

        let outstanding = ctx.collectible.total_supply();
        let share = pool_share(self.pool_balance, outstanding)?;
        self.pool_balance = self
            .pool_balance
            .checked_sub(share)
            .ok_or(ShopError::Overflow)?;

        let event = ctx.collectible.burn(&self.address, id)?;
        ctx.emit(event);
        let event = ctx.token.transfer(&self.address, &holder, share)?;
        ctx.emit(event);

        debug!(%holder, id, outstanding, share, pool_balance = self.pool_balance, "collectible burned");
        ctx.emit(ShopEvent::CollectibleBurned { holder, id, share });
        Ok(share)
    }

    // ========================================================================
    // OWNER
    // ========================================================================

    /// Move `amount` tokens from the pool to the owner.
    ///
    /// The owner may drain the pool entirely, including the part backing
    /// outstanding collectibles.
    pub fn withdraw(&mut self, ctx: &mut CallContext<'_>, amount: u128) -> Result<u128, ShopError> {
        let caller = ctx.caller();
        if caller != self.owner {
            return Err(ShopError::Unauthorized { caller });
        }
        if amount == 0 {
            return Err(ShopError::InvalidAmount(
                "withdrawal amount cannot be zero".to_string(),
            ));
        }
        if amount > self.pool_balance {
            return Err(ShopError::ExceedsPool {
                requested: amount,
                available: self.pool_balance,
            });
        }

        self.pool_balance -= amount;

        let event = ctx.token.transfer(&self.address, &self.owner, amount)?;
        ctx.emit(event);

        debug!(owner = %self.owner, amount, pool_balance = self.pool_balance, "pool withdrawn");
        ctx.emit(ShopEvent::Withdrawn {
            owner: self.owner,
            amount,
        });
        Ok(amount)
    }
}
