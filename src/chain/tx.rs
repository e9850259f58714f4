use crate::chain::LedgerKind;
use crate::identity::{Address, Keypair, PublicKey, Signature, SignatureError, Signer};
use crate::ledger::TokenId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

const SIGNING_DOMAIN: &[u8] = b"tokenshop:tx:v1";

/// Reasons a transaction is refused before it executes.
/// A refused transaction does not consume its nonce.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TxError {
    #[error("Missing signer: a keypair is required to sign the transaction")]
    MissingSigner,

    #[error("Missing call: the transaction has nothing to execute")]
    MissingCall,

    #[error("Missing nonce: the sender's next nonce is required")]
    MissingNonce,

    #[error("Sender mismatch: public key does not belong to {0}")]
    SenderMismatch(Address),

    #[error("Invalid signature: {0}")]
    InvalidSignature(#[from] SignatureError),

    #[error("Nonce mismatch: expected {expected}, got {got}")]
    NonceMismatch { expected: u64, got: u64 },
}

/// SHA-256 of a transaction's signing bytes
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxId([u8; 32]);

impl TxId {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({})", self)
    }
}

/// The operations a transaction can invoke
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Call {
    /// Exchange attached native value for tokens (payable)
    PurchaseTokens { amount: u128 },
    /// Burn tokens for a native payout
    BurnTokens { amount: u128 },
    /// Pay the collectible price into the pool for a new collectible
    PurchaseCollectible,
    /// Burn a collectible for a share of the pool
    BurnCollectible { id: TokenId },
    /// Owner-only pool withdrawal
    Withdraw { amount: u128 },
    ApproveTokens { spender: Address, amount: u128 },
    TransferTokens { to: Address, amount: u128 },
    ApproveCollectible { spender: Address, id: TokenId },
    TransferCollectible { to: Address, id: TokenId },
    GrantMinter { ledger: LedgerKind, account: Address },
    RevokeMinter { ledger: LedgerKind, account: Address },
    /// Plain native transfer to an externally owned account (payable)
    TransferNative { to: Address },
}

impl Call {
    /// Whether the call may carry native value
    pub fn is_payable(&self) -> bool {
        matches!(self, Call::PurchaseTokens { .. } | Call::TransferNative { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Call::PurchaseTokens { .. } => "purchase_tokens",
            Call::BurnTokens { .. } => "burn_tokens",
            Call::PurchaseCollectible => "purchase_collectible",
            Call::BurnCollectible { .. } => "burn_collectible",
            Call::Withdraw { .. } => "withdraw",
            Call::ApproveTokens { .. } => "approve_tokens",
            Call::TransferTokens { .. } => "transfer_tokens",
            Call::ApproveCollectible { .. } => "approve_collectible",
            Call::TransferCollectible { .. } => "transfer_collectible",
            Call::GrantMinter { .. } => "grant_minter",
            Call::RevokeMinter { .. } => "revoke_minter",
            Call::TransferNative { .. } => "transfer_native",
        }
    }
}

/// An unsigned call with its sender, nonce and attached value
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    sender: Address,
    nonce: u64,
    value: u128,
    call: Call,
}

impl Transaction {
    pub fn new(sender: Address, nonce: u64, value: u128, call: Call) -> Self {
        Self {
            sender,
            nonce,
            value,
            call,
        }
    }

    pub fn sender(&self) -> &Address {
        &self.sender
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn value(&self) -> u128 {
        self.value
    }

    pub fn call(&self) -> &Call {
        &self.call
    }

    pub fn id(&self) -> TxId {
        let hash = Sha256::digest(self.to_signing_bytes());
        let mut id = [0u8; 32];
        id.copy_from_slice(&hash);
        TxId(id)
    }

    /// Domain-separated postcard encoding of every field
    pub fn to_signing_bytes(&self) -> Vec<u8> {
        let mut bytes = SIGNING_DOMAIN.to_vec();
        // Encoding fixed-shape derived types into a Vec cannot fail
        bytes.extend(postcard::to_allocvec(self).expect("Failed to encode transaction"));
        bytes
    }
}

/// A transaction together with the key and signature that authorize it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    tx: Transaction,
    public_key: PublicKey,
    signature: Signature,
}

impl SignedTransaction {
    pub fn from_parts(tx: Transaction, public_key: PublicKey, signature: Signature) -> Self {
        Self {
            tx,
            public_key,
            signature,
        }
    }

    pub fn tx(&self) -> &Transaction {
        &self.tx
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn id(&self) -> TxId {
        self.tx.id()
    }

    pub fn verify(&self) -> Result<(), SignatureError> {
        Signer::verify(&self.public_key, &self.tx.to_signing_bytes(), &self.signature)
    }
}

/// Builder for signed transactions
pub struct TransactionBuilder<'a> {
    signer: Option<&'a Keypair>,
    call: Option<Call>,
    nonce: Option<u64>,
    value: u128,
}

impl<'a> TransactionBuilder<'a> {
    pub fn new() -> Self {
        Self {
            signer: None,
            call: None,
            nonce: None,
            value: 0,
        }
    }

    /// Set the signing keypair (required)
    pub fn signer(mut self, keypair: &'a Keypair) -> Self {
        self.signer = Some(keypair);
        self
    }

    /// Set the call (required)
    pub fn call(mut self, call: Call) -> Self {
        self.call = Some(call);
        self
    }

    /// Set the sender's nonce (required)
    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Attach native value (defaults to 0)
    pub fn value(mut self, value: u128) -> Self {
        self.value = value;
        self
    }

    pub fn build(self) -> Result<SignedTransaction, TxError> {
        let keypair = self.signer.ok_or(TxError::MissingSigner)?;
        let call = self.call.ok_or(TxError::MissingCall)?;
        let nonce = self.nonce.ok_or(TxError::MissingNonce)?;

        let tx = Transaction::new(keypair.address(), nonce, self.value, call);
        let signature = Signer::sign(keypair, &tx.to_signing_bytes());

        Ok(SignedTransaction::from_parts(tx, keypair.public_key(), signature))
    }
}

impl<'a> Default for TransactionBuilder<'a> {
    fn default() -> Self {
        Self::new()
    }
}
