// Shop module - the exchange core
// Native <-> token conversion at a fixed ratio, token <-> collectible conversion
// against a shared pool, and owner withdrawal from that pool.

mod config;
mod error;
mod events;
mod sale;

pub use config::ExchangeConfig;
pub use error::{ErrorKind, ShopError};
pub use events::ShopEvent;
pub use sale::{pool_share, TokenSale};
