use crate::shop::ShopError;
use serde::{Deserialize, Serialize};

/// Conversion parameters fixed at deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Native-currency units per one fungible-token unit
    ratio: u128,
    /// Fungible-token units per collectible
    collectible_price: u128,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            ratio: 5,
            collectible_price: 1,
        }
    }
}

impl ExchangeConfig {
    pub fn new(ratio: u128, collectible_price: u128) -> Result<Self, ShopError> {
        let config = Self {
            ratio,
            collectible_price,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_ratio(mut self, ratio: u128) -> Self {
        self.ratio = ratio;
        self
    }

    pub fn with_collectible_price(mut self, price: u128) -> Self {
        self.collectible_price = price;
        self
    }

    pub fn ratio(&self) -> u128 {
        self.ratio
    }

    pub fn collectible_price(&self) -> u128 {
        self.collectible_price
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ShopError> {
        if self.ratio == 0 {
            return Err(ShopError::InvalidConfig("ratio cannot be 0".to_string()));
        }
        if self.collectible_price == 0 {
            return Err(ShopError::InvalidConfig(
                "collectible price cannot be 0".to_string(),
            ));
        }
        Ok(())
    }
}
