use crate::identity::Address;
use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const KEY_LEN: usize = 32;

#[derive(Error, Debug)]
pub enum KeypairError {
    #[error("Invalid key length: expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("Invalid key bytes: {0}")]
    InvalidBytes(String),
}

fn to_key_array(bytes: &[u8]) -> Result<[u8; KEY_LEN], KeypairError> {
    bytes.try_into().map_err(|_| KeypairError::InvalidLength {
        expected: KEY_LEN,
        got: bytes.len(),
    })
}

/// Ed25519 public key of an account
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeypairError> {
        let arr = to_key_array(bytes)?;
        VerifyingKey::from_bytes(&arr)
            .map(Self)
            .map_err(|e| KeypairError::InvalidBytes(e.to_string()))
    }

    /// The account address owned by this key
    pub fn address(&self) -> Address {
        Address::from_public_key(self)
    }

    pub(crate) fn inner(&self) -> &VerifyingKey {
        &self.0
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(self.0.as_bytes())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PublicKeyVisitor;

        impl<'de> serde::de::Visitor<'de> for PublicKeyVisitor {
            type Value = PublicKey;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a 32-byte ed25519 public key")
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                PublicKey::from_bytes(v).map_err(|e| E::custom(e.to_string()))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut bytes = Vec::with_capacity(KEY_LEN);
                while let Some(byte) = seq.next_element::<u8>()? {
                    bytes.push(byte);
                }
                PublicKey::from_bytes(&bytes).map_err(|e| serde::de::Error::custom(e.to_string()))
            }
        }

        deserializer.deserialize_bytes(PublicKeyVisitor)
    }
}

/// Ed25519 keypair controlling one account
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Deterministic keypair from a 32-byte seed
    pub fn from_seed(seed: [u8; KEY_LEN]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key())
    }

    pub fn address(&self) -> Address {
        self.public_key().address()
    }

    /// Secret seed bytes, for persistence
    pub fn to_bytes(&self) -> Vec<u8> {
        self.signing_key.to_bytes().to_vec()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeypairError> {
        Ok(Self::from_seed(to_key_array(bytes)?))
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypair").field("address", &self.address()).finish()
    }
}
