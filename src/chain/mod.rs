// Chain module - transaction admission, atomic execution and receipts
// Hosts the shop and the external ledgers in a single world state

mod codec;
mod context;
mod event;
mod executor;
mod native;
mod receipt;
mod state;
mod tx;
mod validator;

pub use codec::{CodecError, TxCodec};
pub use context::CallContext;
pub use event::{Event, LedgerKind};
pub use executor::{Chain, DeployError};
pub use native::{NativeBank, NativeError, NativeTransfer};
pub use receipt::{Outcome, Receipt, TxStatus};
pub use state::{AuditError, World};
pub use tx::{Call, SignedTransaction, Transaction, TransactionBuilder, TxError, TxId};
pub use validator::TxValidator;
