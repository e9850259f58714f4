// Identity module - account keys, addresses and call signatures

mod address;
mod keypair;
mod signer;

pub use address::*;
pub use keypair::*;
pub use signer::*;
