// Ledger module - the external token ledgers the shop calls into
// and the AccessGate that guards their mint paths

mod access;
mod collectible;
mod fungible;

pub use access::{AccessError, AccessGate, MintCapability, Role, RoleRegistry};
pub use collectible::{CollectibleError, CollectibleEvent, CollectibleLedger, TokenId};
pub use fungible::{FungibleError, FungibleEvent, FungibleLedger};
